mod confirm_dialog;
mod data_table;
mod filter_bar;
mod footer_bar;
mod form_modal;
mod header_bar;
mod help_popup;
mod import_picker;
mod input;
mod link_picker;
mod status_bar;
mod tab_bar;
mod toast_popup;

pub use confirm_dialog::{ConfirmAction, ConfirmDialog, ConfirmDialogWidget};
pub use data_table::{Column, DataTable, TableRow};
pub use filter_bar::FilterBar;
pub use footer_bar::{FocusContext, FooterBar, FooterBarStyle};
pub use form_modal::{FieldKind, FormAction, FormField, FormModal, FormModalWidget, SelectOption};
pub use header_bar::{HeaderBar, HeaderBarStyle};
pub use help_popup::HelpPopup;
pub use import_picker::{ImportAction, ImportPicker, ImportPickerWidget};
pub use input::TextInput;
pub use link_picker::{LinkPicker, LinkPickerAction, LinkPickerWidget, PickerColumn, PickerItem};
pub use status_bar::{StatusBar, StatusLevel};
pub use tab_bar::TabBar;
pub use toast_popup::ToastPopup;
