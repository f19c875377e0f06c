use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "payment_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

/// A purchased photo. The photo reference is not enforced by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub photo_id: Option<Uuid>,
    #[schema(value_type = f64)]
    pub price: Decimal,
}

/// Time-limited download right for a purchased photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadGrant {
    pub photo_id: Option<Uuid>,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl DownloadGrant {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    /// Absent for guest checkout
    pub customer_id: Option<Uuid>,
    pub customer_email: String,
    #[cfg_attr(feature = "sqlx", sqlx(json))]
    pub items: Vec<OrderItem>,
    #[schema(value_type = f64)]
    pub total_amount: Decimal,
    pub currency: String,
    pub payment_status: PaymentStatus,
    pub payment_gateway_id: Option<String>,
    #[cfg_attr(feature = "sqlx", sqlx(json))]
    pub download_links: Vec<DownloadGrant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: Option<Uuid>,
    pub customer_email: String,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub currency: String,
}

impl NewOrder {
    /// Pending order in the default currency whose total is the sum of its items.
    pub fn from_items(customer_email: impl Into<String>, items: Vec<OrderItem>) -> Self {
        let total_amount = items.iter().map(|item| item.price).sum();
        Self {
            customer_id: None,
            customer_email: customer_email.into(),
            items,
            total_amount,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    pub fn with_customer(mut self, customer_id: Uuid) -> Self {
        self.customer_id = Some(customer_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_from_items_sums_total() {
        let order = NewOrder::from_items(
            "buyer@example.com",
            vec![
                OrderItem {
                    photo_id: Some(Uuid::new_v4()),
                    price: Decimal::new(1250, 2),
                },
                OrderItem {
                    photo_id: None,
                    price: Decimal::new(750, 2),
                },
            ],
        );
        assert_eq!(order.total_amount, Decimal::new(2000, 2));
        assert_eq!(order.currency, "USD");
        assert!(order.customer_id.is_none());
    }

    #[test]
    fn test_download_grant_expiry() {
        let now = Utc::now();
        let grant = DownloadGrant {
            photo_id: None,
            token: "t0k3n".to_string(),
            expires_at: now + Duration::hours(24),
        };
        assert!(!grant.is_expired(now));
        assert!(grant.is_expired(now + Duration::hours(24)));
    }

    #[test]
    fn test_payment_status_defaults_to_pending() {
        assert_eq!(PaymentStatus::default(), PaymentStatus::Pending);
        assert_eq!(
            serde_json::to_value(PaymentStatus::Completed).unwrap(),
            serde_json::json!("completed")
        );
    }
}
