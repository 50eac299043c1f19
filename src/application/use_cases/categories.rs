//! Financial category, group and company link use cases.

use std::collections::{HashMap, HashSet};

use serde_json::json;
use tracing::{debug, error, info};

use super::records::{RecordStore, now};
use crate::application::dto::{CategoryForm, GroupForm, id_or_null, text_or_null};
use crate::domain::code::CodeSequence;
use crate::domain::entities::{
    Category, CategoryGroup, CategoryKind, CategoryLink, CategoryOption, Company, CompanyOption,
};
use crate::domain::errors::{OperationError, ValidationError, require};
use crate::domain::filter::{KindFilter, StatusFilter};
use crate::domain::ports::{Filter, Query, Record, Table};

/// A group with the categories filed under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupNode {
    pub group: CategoryGroup,
    pub categories: Vec<Category>,
}

/// Categories bucketed by group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTree {
    pub groups: Vec<GroupNode>,
    pub ungrouped: Vec<Category>,
}

impl CategoryTree {
    /// Categories in display order: grouped first, then ungrouped.
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.groups
            .iter()
            .flat_map(|node| node.categories.iter())
            .chain(self.ungrouped.iter())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.ungrouped.is_empty()
    }
}

/// Entry that can sit on either side of a link picker.
pub trait LinkOption: Clone {
    fn option_id(&self) -> &str;
    fn sort_key(&self) -> &str;
}

impl LinkOption for CompanyOption {
    fn option_id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self) -> &str {
        &self.legal_name
    }
}

impl LinkOption for CategoryOption {
    fn option_id(&self) -> &str {
        &self.id
    }

    fn sort_key(&self) -> &str {
        &self.code
    }
}

/// Options split into linked and available, both kept sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSplit<T> {
    pub linked: Vec<T>,
    pub available: Vec<T>,
}

impl<T> Default for LinkSplit<T> {
    fn default() -> Self {
        Self {
            linked: Vec::new(),
            available: Vec::new(),
        }
    }
}

impl<T: LinkOption> LinkSplit<T> {
    /// Splits `options` by membership in `linked_ids`.
    #[must_use]
    pub fn new(options: Vec<T>, linked_ids: &HashSet<String>) -> Self {
        let (mut linked, mut available): (Vec<T>, Vec<T>) = options
            .into_iter()
            .partition(|option| linked_ids.contains(option.option_id()));
        sort_options(&mut linked);
        sort_options(&mut available);
        Self { linked, available }
    }

    /// Moves `id` from available to linked. Returns whether it moved.
    pub fn link(&mut self, id: &str) -> bool {
        move_option(&mut self.available, &mut self.linked, id)
    }

    /// Moves `id` from linked to available. Returns whether it moved.
    pub fn unlink(&mut self, id: &str) -> bool {
        move_option(&mut self.linked, &mut self.available, id)
    }

    #[must_use]
    pub fn linked_ids(&self) -> Vec<String> {
        self.linked
            .iter()
            .map(|option| option.option_id().to_string())
            .collect()
    }
}

fn sort_options<T: LinkOption>(options: &mut [T]) {
    options.sort_by(|a, b| {
        a.sort_key()
            .to_lowercase()
            .cmp(&b.sort_key().to_lowercase())
    });
}

fn move_option<T: LinkOption>(from: &mut Vec<T>, to: &mut Vec<T>, id: &str) -> bool {
    let Some(index) = from.iter().position(|option| option.option_id() == id) else {
        return false;
    };
    let option = from.remove(index);
    let key = option.sort_key().to_lowercase();
    let at = to.partition_point(|other| other.sort_key().to_lowercase() <= key);
    to.insert(at, option);
    true
}

/// Lists and edits categories, their groups and company links.
#[derive(Clone)]
pub struct CategoriesUseCase {
    store: RecordStore,
}

impl CategoriesUseCase {
    #[must_use]
    pub const fn new(store: RecordStore) -> Self {
        Self { store }
    }

    /// Groups and categories bucketed for display.
    ///
    /// Kind and status filter at fetch; searching is left to the caller.
    ///
    /// # Errors
    /// Returns error if either fetch fails.
    pub async fn load_tree(
        &self,
        kind: KindFilter,
        status: StatusFilter,
    ) -> Result<CategoryTree, OperationError> {
        let groups: Vec<CategoryGroup> = self.store.fetch(&CategoryGroup::query()).await?;

        let query = Category::query()
            .eq_opt("kind", kind.as_kind().map(|k| k.as_str()))
            .active(status.as_active_flag());
        let categories: Vec<Category> = self.store.fetch(&query).await?;

        let tree = build_tree(groups, categories);
        debug!(
            groups = tree.groups.len(),
            ungrouped = tree.ungrouped.len(),
            "Category tree loaded"
        );
        Ok(tree)
    }

    /// Code shown (disabled) in the create form.
    ///
    /// # Errors
    /// Returns error if the existing codes cannot be read.
    pub async fn next_code(&self) -> Result<String, OperationError> {
        self.store
            .next_code(Table::Categories, CodeSequence::CATEGORY)
            .await
    }

    /// # Errors
    /// Returns error if validation, the code check or the insert fails.
    pub async fn create(&self, form: CategoryForm) -> Result<(), OperationError> {
        let kind = validate(&form)?;
        self.store
            .ensure_code_free(Table::Categories, &form.code, None)
            .await?;

        let timestamp = now();
        self.store
            .insert(
                Table::Categories,
                vec![json!({
                    "code": form.code.trim(),
                    "name": form.name.trim(),
                    "description": text_or_null(&form.description),
                    "kind": kind.as_str(),
                    "group_id": id_or_null(form.group_id.as_deref()),
                    "active": true,
                    "created_at": timestamp,
                    "updated_at": timestamp,
                })],
            )
            .await?;

        info!(code = %form.code, "Category created");
        Ok(())
    }

    /// # Errors
    /// Returns error if validation, the code check or the update fails.
    pub async fn update(&self, category: &Category, form: CategoryForm) -> Result<(), OperationError> {
        let kind = validate(&form)?;
        if form.code.trim() != category.code {
            self.store
                .ensure_code_free(Table::Categories, &form.code, Some(&category.id))
                .await?;
        }

        self.store
            .update(
                Table::Categories,
                &category.id,
                json!({
                    "code": form.code.trim(),
                    "name": form.name.trim(),
                    "description": text_or_null(&form.description),
                    "kind": kind.as_str(),
                    "group_id": id_or_null(form.group_id.as_deref()),
                    "updated_at": now(),
                }),
            )
            .await?;

        info!(category_id = %category.id, "Category updated");
        Ok(())
    }

    /// Reads the stored flag and flips it.
    ///
    /// # Errors
    /// Returns error if the read or the update fails.
    pub async fn toggle_active(&self, id: &str) -> Result<bool, OperationError> {
        let current: Category = self.store.fetch_by_id(id).await?;
        let active = !current.active;
        self.store.set_active(Table::Categories, id, active).await?;
        info!(category_id = %id, active, "Category status toggled");
        Ok(active)
    }

    /// # Errors
    /// Returns error if the delete fails.
    pub async fn delete(&self, id: &str) -> Result<(), OperationError> {
        self.store.delete(Table::Categories, id).await?;
        info!(category_id = %id, "Category deleted");
        Ok(())
    }

    /// # Errors
    /// Returns error if the fetch fails.
    pub async fn groups(&self) -> Result<Vec<CategoryGroup>, OperationError> {
        self.store.fetch(&CategoryGroup::query()).await
    }

    /// # Errors
    /// Returns error if validation or the insert fails.
    pub async fn create_group(&self, form: GroupForm) -> Result<(), OperationError> {
        require("name", &form.name)?;

        let timestamp = now();
        self.store
            .insert(
                Table::CategoryGroups,
                vec![json!({
                    "name": form.name.trim(),
                    "description": text_or_null(&form.description),
                    "active": true,
                    "created_at": timestamp,
                    "updated_at": timestamp,
                })],
            )
            .await?;

        info!(name = %form.name, "Category group created");
        Ok(())
    }

    /// # Errors
    /// Returns error if validation or the update fails.
    pub async fn update_group(&self, id: &str, form: GroupForm) -> Result<(), OperationError> {
        require("name", &form.name)?;

        self.store
            .update(
                Table::CategoryGroups,
                id,
                json!({
                    "name": form.name.trim(),
                    "description": text_or_null(&form.description),
                    "updated_at": now(),
                }),
            )
            .await?;

        info!(group_id = %id, "Category group updated");
        Ok(())
    }

    /// # Errors
    /// Returns error if the delete fails.
    pub async fn delete_group(&self, id: &str) -> Result<(), OperationError> {
        self.store.delete(Table::CategoryGroups, id).await?;
        info!(group_id = %id, "Category group deleted");
        Ok(())
    }

    /// Companies linked to the category versus the rest.
    ///
    /// # Errors
    /// Returns error if companies or links cannot be read.
    pub async fn links_for_category(
        &self,
        category_id: &str,
    ) -> Result<LinkSplit<CompanyOption>, OperationError> {
        let companies: Vec<CompanyOption> = self
            .store
            .fetch_as(&Company::query().columns("id,legal_name"))
            .await?;
        let links = self.links("category_id", category_id).await?;
        let linked: HashSet<String> = links.into_iter().map(|l| l.company_id).collect();

        Ok(LinkSplit::new(companies, &linked))
    }

    /// Replaces every company link of the category with `company_ids`.
    ///
    /// The delete and insert are separate calls; if the insert fails the
    /// category is left unlinked.
    ///
    /// # Errors
    /// Returns error if either step fails.
    pub async fn save_category_links(
        &self,
        category_id: &str,
        company_ids: &[String],
    ) -> Result<(), OperationError> {
        let rows = company_ids
            .iter()
            .map(|company_id| json!({ "category_id": category_id, "company_id": company_id }))
            .collect();
        self.rewrite_links(Filter::eq("category_id", category_id), rows)
            .await?;

        info!(category_id = %category_id, count = company_ids.len(), "Category links saved");
        Ok(())
    }

    /// Categories linked to the company versus the rest.
    ///
    /// # Errors
    /// Returns error if categories or links cannot be read.
    pub async fn links_for_company(
        &self,
        company_id: &str,
    ) -> Result<LinkSplit<CategoryOption>, OperationError> {
        let categories: Vec<CategoryOption> = self
            .store
            .fetch_as(&Category::query().columns("id,code,name"))
            .await?;
        let links = self.links("company_id", company_id).await?;
        let linked: HashSet<String> = links.into_iter().map(|l| l.category_id).collect();

        Ok(LinkSplit::new(categories, &linked))
    }

    /// Replaces every category link of the company with `category_ids`.
    ///
    /// # Errors
    /// Returns error if either step fails.
    pub async fn save_company_links(
        &self,
        company_id: &str,
        category_ids: &[String],
    ) -> Result<(), OperationError> {
        let rows = category_ids
            .iter()
            .map(|category_id| json!({ "category_id": category_id, "company_id": company_id }))
            .collect();
        self.rewrite_links(Filter::eq("company_id", company_id), rows)
            .await?;

        info!(company_id = %company_id, count = category_ids.len(), "Company links saved");
        Ok(())
    }

    async fn links(&self, column: &str, id: &str) -> Result<Vec<CategoryLink>, OperationError> {
        let query = Query::table(Table::CategoryCompanies)
            .columns("category_id,company_id")
            .eq(column, id);
        self.store.fetch_as(&query).await
    }

    async fn rewrite_links(
        &self,
        scope: Filter,
        rows: Vec<serde_json::Value>,
    ) -> Result<(), OperationError> {
        self.store
            .delete_where(Table::CategoryCompanies, std::slice::from_ref(&scope))
            .await?;

        if rows.is_empty() {
            return Ok(());
        }

        self.store
            .insert(Table::CategoryCompanies, rows)
            .await
            .map_err(|e| {
                error!(error = %e, column = %scope.column, "Links deleted but not re-inserted");
                e
            })?;
        Ok(())
    }
}

fn validate(form: &CategoryForm) -> Result<CategoryKind, OperationError> {
    require("code", &form.code)?;
    require("name", &form.name)?;
    form.kind
        .ok_or_else(|| ValidationError::required("kind").into())
}

fn build_tree(groups: Vec<CategoryGroup>, categories: Vec<Category>) -> CategoryTree {
    let index: HashMap<&str, usize> = groups
        .iter()
        .enumerate()
        .map(|(i, g)| (g.id.as_str(), i))
        .collect();

    let mut by_group: Vec<Vec<Category>> = vec![Vec::new(); groups.len()];
    let mut ungrouped = Vec::new();

    for category in categories {
        match category.group_id.as_deref().and_then(|id| index.get(id)) {
            Some(&i) => by_group[i].push(category),
            None => ungrouped.push(category),
        }
    }

    let groups = groups
        .into_iter()
        .zip(by_group)
        .map(|(group, categories)| GroupNode { group, categories })
        .collect();

    CategoryTree { groups, ungrouped }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::use_cases::records::fixtures::store;
    use crate::domain::ports::mocks::{InMemoryDataPort, Operation};

    fn seeded() -> Arc<InMemoryDataPort> {
        Arc::new(
            InMemoryDataPort::new()
                .with_rows(
                    Table::CategoryGroups,
                    vec![
                        json!({"id": "g2", "name": "Payroll"}),
                        json!({"id": "g1", "name": "Operations"}),
                    ],
                )
                .with_rows(
                    Table::Categories,
                    vec![
                        json!({"id": "k1", "code": "CAT001", "name": "Rent", "kind": "expense", "group_id": "g1", "active": true}),
                        json!({"id": "k2", "code": "CAT002", "name": "Salaries", "kind": "expense", "group_id": "g2", "active": true}),
                        json!({"id": "k3", "code": "CAT003", "name": "Consulting", "kind": "revenue", "group_id": null, "active": true}),
                        json!({"id": "k4", "code": "CAT004", "name": "Old fees", "kind": "expense", "group_id": null, "active": false}),
                    ],
                )
                .with_rows(
                    Table::Companies,
                    vec![
                        json!({"id": "co2", "legal_name": "Beta"}),
                        json!({"id": "co1", "legal_name": "Acme"}),
                        json!({"id": "co3", "legal_name": "Cora"}),
                    ],
                )
                .with_rows(
                    Table::CategoryCompanies,
                    vec![
                        json!({"category_id": "k1", "company_id": "co2"}),
                        json!({"category_id": "k2", "company_id": "co2"}),
                    ],
                ),
        )
    }

    fn form(code: &str) -> CategoryForm {
        CategoryForm {
            code: code.to_string(),
            name: "Taxes".to_string(),
            kind: Some(CategoryKind::Expense),
            group_id: Some(String::new()),
            ..CategoryForm::default()
        }
    }

    #[tokio::test]
    async fn test_tree_buckets_by_group() {
        let port = seeded();
        let use_case = CategoriesUseCase::new(store(&port));

        let tree = use_case
            .load_tree(KindFilter::All, StatusFilter::Active)
            .await
            .unwrap();

        let names: Vec<_> = tree.groups.iter().map(|n| n.group.name.as_str()).collect();
        assert_eq!(names, ["Operations", "Payroll"]);
        assert_eq!(tree.groups[0].categories[0].code, "CAT001");
        assert_eq!(tree.ungrouped.len(), 1);
        assert_eq!(tree.categories().count(), 3);
    }

    #[tokio::test]
    async fn test_kind_filter_keeps_every_group() {
        let port = seeded();
        let use_case = CategoriesUseCase::new(store(&port));

        let tree = use_case
            .load_tree(KindFilter::Expense, StatusFilter::All)
            .await
            .unwrap();

        assert_eq!(tree.groups.len(), 2);
        assert_eq!(tree.ungrouped.len(), 1);
        assert!(tree.categories().all(|c| c.kind == CategoryKind::Expense));
    }

    #[tokio::test]
    async fn test_create_requires_kind_and_nulls_empty_group() {
        let port = seeded();
        let use_case = CategoriesUseCase::new(store(&port));

        let mut missing_kind = form("CAT005");
        missing_kind.kind = None;
        assert!(matches!(
            use_case.create(missing_kind).await,
            Err(OperationError::Validation(ValidationError::Required { field: "kind" }))
        ));

        assert_eq!(use_case.next_code().await.unwrap(), "CAT005");
        use_case.create(form("CAT005")).await.unwrap();

        let row = port
            .rows(Table::Categories)
            .into_iter()
            .find(|r| r["code"] == "CAT005")
            .unwrap();
        assert!(row["group_id"].is_null());
        assert_eq!(row["kind"], "expense");
        assert_eq!(row["active"], true);
    }

    #[tokio::test]
    async fn test_toggle_reads_current_flag() {
        let port = seeded();
        let use_case = CategoriesUseCase::new(store(&port));

        assert!(use_case.toggle_active("k4").await.unwrap());
        assert_eq!(port.row(Table::Categories, "k4").unwrap()["active"], true);
        assert_eq!(
            port.calls(),
            [
                (Operation::Select, Table::Categories),
                (Operation::Update, Table::Categories)
            ]
        );
    }

    #[tokio::test]
    async fn test_links_for_category_split_sorted() {
        let port = seeded();
        let use_case = CategoriesUseCase::new(store(&port));

        let split = use_case.links_for_category("k1").await.unwrap();

        assert_eq!(split.linked_ids(), ["co2"]);
        let available: Vec<_> = split.available.iter().map(|c| c.legal_name.as_str()).collect();
        assert_eq!(available, ["Acme", "Cora"]);
    }

    #[tokio::test]
    async fn test_save_links_replaces_previous_set() {
        let port = seeded();
        let use_case = CategoriesUseCase::new(store(&port));

        use_case
            .save_category_links("k1", &["co1".to_string(), "co3".to_string()])
            .await
            .unwrap();

        let split = use_case.links_for_category("k1").await.unwrap();
        assert_eq!(split.linked_ids(), ["co1", "co3"]);
        assert_eq!(port.rows(Table::CategoryCompanies).len(), 3);
    }

    #[tokio::test]
    async fn test_empty_link_set_skips_insert() {
        let port = seeded();
        let use_case = CategoriesUseCase::new(store(&port));

        use_case.save_category_links("k1", &[]).await.unwrap();

        assert_eq!(port.calls(), [(Operation::Delete, Table::CategoryCompanies)]);
    }

    #[tokio::test]
    async fn test_failed_insert_leaves_category_unlinked() {
        let port = seeded();
        let use_case = CategoriesUseCase::new(store(&port));
        port.fail_next(Operation::Insert, Table::CategoryCompanies);

        let result = use_case
            .save_category_links("k1", &["co1".to_string()])
            .await;

        assert!(result.is_err());
        let split = use_case.links_for_category("k1").await.unwrap();
        assert!(split.linked.is_empty());
    }

    #[tokio::test]
    async fn test_company_links_bulk() {
        let port = seeded();
        let use_case = CategoriesUseCase::new(store(&port));

        let split = use_case.links_for_company("co2").await.unwrap();
        assert_eq!(split.linked_ids(), ["k1", "k2"]);
        assert_eq!(split.available.len(), 2);

        use_case
            .save_company_links("co2", &["k3".to_string()])
            .await
            .unwrap();

        let split = use_case.links_for_company("co2").await.unwrap();
        assert_eq!(split.linked_ids(), ["k3"]);
    }

    #[test]
    fn test_link_split_moves_keep_order() {
        let option = |id: &str, code: &str| CategoryOption {
            id: id.to_string(),
            code: code.to_string(),
            name: String::new(),
        };
        let mut split = LinkSplit::new(
            vec![option("a", "CAT003"), option("b", "CAT001"), option("c", "CAT002")],
            &HashSet::from(["a".to_string()]),
        );

        assert!(split.link("b"));
        assert_eq!(split.linked_ids(), ["b", "a"]);
        assert!(split.unlink("a"));
        let available: Vec<_> = split.available.iter().map(|o| o.code.as_str()).collect();
        assert_eq!(available, ["CAT002", "CAT003"]);
        assert!(!split.unlink("zzz"));
    }
}
