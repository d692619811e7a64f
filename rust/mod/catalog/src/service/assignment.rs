use catalog_core::{next_id, now_rfc3339, ServiceError};
use tracing::info;

use super::{files, CatalogService};
use crate::model::ClientProduct;

impl CatalogService {
    pub async fn list_assignments(&self) -> Vec<ClientProduct> {
        self.state.read().await.assignments.clone()
    }

    /// Assign a product to a client. Each pair is assigned at most once.
    pub async fn assign_product(
        &self,
        client_id: i64,
        product_id: i64,
    ) -> Result<ClientProduct, ServiceError> {
        let entry = self
            .commit(&[files::CLIENT_PRODUCTS], |state| {
                if state
                    .assignments
                    .iter()
                    .any(|a| a.client_id == client_id && a.product_id == product_id)
                {
                    return Err(ServiceError::AlreadyExists("Already assigned".to_string()));
                }

                let entry = ClientProduct {
                    id: next_id(state.assignments.iter().map(|a| a.id)),
                    client_id,
                    product_id,
                    assigned_at: Some(now_rfc3339()),
                };
                state.assignments.push(entry.clone());
                Ok(entry)
            })
            .await?;

        info!(client_id, product_id, "Product assigned");
        Ok(entry)
    }

    pub async fn delete_assignment(&self, id: i64) -> Result<(), ServiceError> {
        self.commit(&[files::CLIENT_PRODUCTS], |state| {
            let before = state.assignments.len();
            state.assignments.retain(|a| a.id != id);
            if state.assignments.len() == before {
                return Err(ServiceError::not_found("Assignment"));
            }
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_assign_once() {
        let svc = CatalogService::in_memory();
        let a = svc.assign_product(1, 2).await.unwrap();
        assert_eq!(a.id, 1);
        assert!(a.assigned_at.is_some());

        let err = svc.assign_product(1, 2).await.unwrap_err();
        assert_eq!(err.to_string(), "Already assigned");
        assert_eq!(err.status_code().as_u16(), 400);

        let b = svc.assign_product(1, 3).await.unwrap();
        assert_eq!(b.id, 2);
        assert_eq!(svc.list_assignments().await.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_assignment() {
        let svc = CatalogService::in_memory();
        svc.assign_product(1, 2).await.unwrap();
        svc.delete_assignment(1).await.unwrap();
        assert!(svc.list_assignments().await.is_empty());
        assert!(svc.delete_assignment(1).await.is_err());
        svc.assign_product(1, 2).await.unwrap();
    }
}
