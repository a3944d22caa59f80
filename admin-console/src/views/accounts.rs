//! Account directory

use std::sync::Arc;

use shared::error::AppResult;
use shared::models::{Account, AccountRole};

use crate::db::AccountRepository;
use crate::live::{LookaheadPolicy, PageSpec, PageWindow, PagedLiveQuery};
use crate::store::{DocumentStore, Filter};

pub struct AccountDirectory {
    page: PagedLiveQuery<Account>,
    accounts: AccountRepository,
    role: Option<AccountRole>,
}

impl AccountDirectory {
    pub fn new(store: Arc<dyn DocumentStore>, page_size: usize, lookahead: LookaheadPolicy) -> Self {
        Self {
            page: PagedLiveQuery::new(store.clone(), PageSpec::of::<Account>(page_size))
                .with_lookahead(lookahead),
            accounts: AccountRepository::new(store),
            role: None,
        }
    }

    pub fn role(&self) -> Option<AccountRole> {
        self.role
    }

    pub fn window(&self) -> &PageWindow<Account> {
        self.page.window()
    }

    pub fn page_mut(&mut self) -> &mut PagedLiveQuery<Account> {
        &mut self.page
    }

    pub async fn open(&mut self, role: Option<AccountRole>) -> AppResult<&PageWindow<Account>> {
        self.role = role;
        let filter = match role {
            Some(role) => Filter::none().eq("role", role.as_str()),
            None => Filter::none(),
        };
        self.page.set_filter(filter).await
    }

    pub async fn next_page(&mut self) -> AppResult<bool> {
        self.page.next_page().await
    }

    pub async fn prev_page(&mut self) -> AppResult<bool> {
        self.page.prev_page().await
    }

    pub async fn set_disabled(&self, id: &str, disabled: bool) -> AppResult<()> {
        self.accounts.set_disabled(id, disabled).await
    }

    pub async fn set_role(&self, id: &str, role: AccountRole) -> AppResult<()> {
        self.accounts.set_role(id, role).await
    }

    pub fn close(&mut self) {
        self.page.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_role_change_moves_account_between_tabs() {
        let store = MemoryStore::new();
        store.seed(
            "accounts",
            [
                ("a1", "staff", 1),
                ("a2", "customer", 2),
                ("a3", "customer", 3),
            ]
            .map(|(id, role, at)| {
                (
                    id.to_string(),
                    json!({ "email": format!("{}@example.com", id), "displayName": id, "role": role, "createdAt": at })
                        .as_object()
                        .cloned()
                        .unwrap(),
                )
            }),
        );
        let mut directory = AccountDirectory::new(Arc::new(store), 10, LookaheadPolicy::EverySnapshot);
        directory.open(Some(AccountRole::Customer)).await.unwrap();
        assert_eq!(directory.window().len(), 2);

        directory.set_role("a2", AccountRole::Staff).await.unwrap();
        directory.page_mut().changed().await.unwrap();
        let ids: Vec<&str> = directory.window().items.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a3"]);
    }
}
