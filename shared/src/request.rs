//! Request bodies accepted by the ordering API

use crate::models::NewItem;

/// Body of `POST /mesas/{id}/pedido`
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct AddItemsRequest {
    pub items: Vec<NewItem>,
}
