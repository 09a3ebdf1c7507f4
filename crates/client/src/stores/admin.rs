//! Admin store: demo admin session plus read-only dashboard fixtures.
//!
//! Orders, sellers, and the headline stats are static fixtures - the admin
//! dashboard renders them but nothing in the core logic mutates them.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use vintly_core::{FulfillmentMethod, OrderId, OrderStatus, SellerRef, SellerStatus};

use crate::storage::{StorageEngine, keys};
use crate::sync::{ChangeBus, StoreEvent};

/// Demo admin credentials.
const ADMIN_EMAIL: &str = "admin@vintly.com";
const ADMIN_PASSWORD: &str = "admin123";

/// Value stored under the admin session key when logged in.
const SESSION_FLAG: &str = "true";

/// A marketplace order as shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub product_title: String,
    pub product_image: String,
    pub product_price: Decimal,
    pub buyer_name: String,
    pub buyer_email: String,
    pub seller_name: String,
    pub status: OrderStatus,
    pub shipping_method: FulfillmentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A seller profile as shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub id: SellerRef,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub status: SellerStatus,
    pub rating: f64,
    pub total_sales: u32,
    pub total_revenue: u64,
    pub joined_at: String,
    pub location: String,
    pub verified: bool,
    pub active_listings: u32,
}

/// Headline numbers for the dashboard cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_revenue: u64,
    pub total_orders: u32,
    pub active_sellers: u32,
    pub active_listings: u32,
    pub pending_orders: u32,
    pub pending_verifications: u32,
}

/// Repository for the admin session flag and dashboard fixtures.
#[derive(Clone)]
pub struct AdminStore {
    engine: Arc<dyn StorageEngine>,
    bus: ChangeBus,
}

impl AdminStore {
    /// Create an admin store over the given engine and bus.
    #[must_use]
    pub fn new(engine: Arc<dyn StorageEngine>, bus: ChangeBus) -> Self {
        Self { engine, bus }
    }

    /// Whether the admin session flag is set.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.engine
            .get(keys::ADMIN_SESSION)
            .is_some_and(|v| v == SESSION_FLAG)
    }

    /// Check the demo credentials and set the session flag on success.
    pub fn login(&self, email: &str, password: &str) -> bool {
        if email == ADMIN_EMAIL && password == ADMIN_PASSWORD {
            self.engine.set(keys::ADMIN_SESSION, SESSION_FLAG);
            self.bus.publish(StoreEvent::AdminSessionChanged);
            true
        } else {
            false
        }
    }

    /// Clear the session flag.
    pub fn logout(&self) {
        self.engine.remove(keys::ADMIN_SESSION);
        self.bus.publish(StoreEvent::AdminSessionChanged);
    }

    /// The fixture orders shown on the dashboard.
    #[must_use]
    pub fn sample_orders(&self) -> Vec<Order> {
        sample_orders()
    }

    /// The fixture sellers shown on the dashboard.
    #[must_use]
    pub fn sample_sellers(&self) -> Vec<Seller> {
        sample_sellers()
    }

    /// The headline dashboard numbers.
    #[must_use]
    pub fn dashboard_stats(&self) -> DashboardStats {
        DashboardStats {
            total_revenue: 1_896_000,
            total_orders: 572,
            active_sellers: 48,
            active_listings: 156,
            pending_orders: 12,
            pending_verifications: 5,
        }
    }
}

fn sample_orders() -> Vec<Order> {
    vec![
        Order {
            id: OrderId::new("ord_1"),
            order_number: "VTL-20240115-001".to_owned(),
            product_title: "Chanel Classic Flap Bag Medium Caviar".to_owned(),
            product_image: "https://images.unsplash.com/photo-1548036328-c9fa89d128fa?w=200&h=200&fit=crop".to_owned(),
            product_price: Decimal::from(4850),
            buyer_name: "Emily Thompson".to_owned(),
            buyer_email: "emily@example.com".to_owned(),
            seller_name: "Alexandra".to_owned(),
            status: OrderStatus::Shipped,
            shipping_method: FulfillmentMethod::Delivery,
            shipping_address: Some("123 Park Avenue, New York, NY 10001".to_owned()),
            tracking_number: Some("1Z999AA10123456784".to_owned()),
            created_at: "2024-01-15T10:30:00Z".to_owned(),
            updated_at: "2024-01-16T14:20:00Z".to_owned(),
        },
        Order {
            id: OrderId::new("ord_2"),
            order_number: "VTL-20240114-002".to_owned(),
            product_title: "Hermès Birkin 30 Togo Leather".to_owned(),
            product_image: "https://images.unsplash.com/photo-1584917865442-de89df76afd3?w=200&h=200&fit=crop".to_owned(),
            product_price: Decimal::from(12500),
            buyer_name: "Sarah Mitchell".to_owned(),
            buyer_email: "sarah@example.com".to_owned(),
            seller_name: "Isabelle".to_owned(),
            status: OrderStatus::Confirmed,
            shipping_method: FulfillmentMethod::Delivery,
            shipping_address: Some("456 Luxury Lane, Beverly Hills, CA 90210".to_owned()),
            tracking_number: None,
            created_at: "2024-01-14T15:45:00Z".to_owned(),
            updated_at: "2024-01-14T16:00:00Z".to_owned(),
        },
        Order {
            id: OrderId::new("ord_3"),
            order_number: "VTL-20240113-003".to_owned(),
            product_title: "Dior Bar Jacket Wool Silk Blend".to_owned(),
            product_image: "https://images.unsplash.com/photo-1591047139829-d91aecb6caea?w=200&h=200&fit=crop".to_owned(),
            product_price: Decimal::from(2890),
            buyer_name: "Jessica Wang".to_owned(),
            buyer_email: "jessica@example.com".to_owned(),
            seller_name: "Margaux".to_owned(),
            status: OrderStatus::Delivered,
            shipping_method: FulfillmentMethod::Delivery,
            shipping_address: Some("789 Fashion Street, Miami, FL 33101".to_owned()),
            tracking_number: Some("1Z999AA10123456785".to_owned()),
            created_at: "2024-01-13T09:15:00Z".to_owned(),
            updated_at: "2024-01-17T11:30:00Z".to_owned(),
        },
        Order {
            id: OrderId::new("ord_4"),
            order_number: "VTL-20240112-004".to_owned(),
            product_title: "Valentino Haute Couture Gown Silk".to_owned(),
            product_image: "https://images.unsplash.com/photo-1566174053879-31528523f8ae?w=200&h=200&fit=crop".to_owned(),
            product_price: Decimal::from(8900),
            buyer_name: "Amanda Roberts".to_owned(),
            buyer_email: "amanda@example.com".to_owned(),
            seller_name: "Victoria".to_owned(),
            status: OrderStatus::Pending,
            shipping_method: FulfillmentMethod::Pickup,
            shipping_address: None,
            tracking_number: None,
            created_at: "2024-01-12T18:00:00Z".to_owned(),
            updated_at: "2024-01-12T18:00:00Z".to_owned(),
        },
        Order {
            id: OrderId::new("ord_5"),
            order_number: "VTL-20240111-005".to_owned(),
            product_title: "Louboutin So Kate 120mm Patent".to_owned(),
            product_image: "https://images.unsplash.com/photo-1543163521-1bf539c55dd2?w=200&h=200&fit=crop".to_owned(),
            product_price: Decimal::from(595),
            buyer_name: "Nicole Davis".to_owned(),
            buyer_email: "nicole@example.com".to_owned(),
            seller_name: "Camille".to_owned(),
            status: OrderStatus::Cancelled,
            shipping_method: FulfillmentMethod::Delivery,
            shipping_address: Some("321 Style Ave, Chicago, IL 60601".to_owned()),
            tracking_number: None,
            created_at: "2024-01-11T12:30:00Z".to_owned(),
            updated_at: "2024-01-12T09:00:00Z".to_owned(),
        },
    ]
}

fn sample_sellers() -> Vec<Seller> {
    vec![
        Seller {
            id: SellerRef::new("sel_1"),
            name: "Alexandra".to_owned(),
            email: "alexandra@example.com".to_owned(),
            avatar: "https://images.unsplash.com/photo-1494790108377-be9c29b29330?w=100&h=100&fit=crop".to_owned(),
            status: SellerStatus::Active,
            rating: 4.9,
            total_sales: 89,
            total_revenue: 245_000,
            joined_at: "2021-03-15".to_owned(),
            location: "Paris, France".to_owned(),
            verified: true,
            active_listings: 12,
        },
        Seller {
            id: SellerRef::new("sel_2"),
            name: "Margaux".to_owned(),
            email: "margaux@example.com".to_owned(),
            avatar: "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?w=100&h=100&fit=crop".to_owned(),
            status: SellerStatus::Active,
            rating: 4.8,
            total_sales: 156,
            total_revenue: 389_000,
            joined_at: "2020-07-22".to_owned(),
            location: "Monaco".to_owned(),
            verified: true,
            active_listings: 8,
        },
        Seller {
            id: SellerRef::new("sel_3"),
            name: "Isabelle".to_owned(),
            email: "isabelle@example.com".to_owned(),
            avatar: "https://images.unsplash.com/photo-1534528741775-53994a69daeb?w=100&h=100&fit=crop".to_owned(),
            status: SellerStatus::Active,
            rating: 5.0,
            total_sales: 312,
            total_revenue: 1_250_000,
            joined_at: "2019-01-10".to_owned(),
            location: "Geneva, Switzerland".to_owned(),
            verified: true,
            active_listings: 24,
        },
        Seller {
            id: SellerRef::new("sel_4"),
            name: "Victoria".to_owned(),
            email: "victoria@example.com".to_owned(),
            avatar: "https://images.unsplash.com/photo-1517841905240-472988babdf9?w=100&h=100&fit=crop".to_owned(),
            status: SellerStatus::Pending,
            rating: 0.0,
            total_sales: 0,
            total_revenue: 0,
            joined_at: "2024-01-10".to_owned(),
            location: "London, UK".to_owned(),
            verified: false,
            active_listings: 3,
        },
        Seller {
            id: SellerRef::new("sel_5"),
            name: "Camille".to_owned(),
            email: "camille@example.com".to_owned(),
            avatar: "https://images.unsplash.com/photo-1544005313-94ddf0286df2?w=100&h=100&fit=crop".to_owned(),
            status: SellerStatus::Suspended,
            rating: 3.2,
            total_sales: 15,
            total_revenue: 12_000,
            joined_at: "2023-06-01".to_owned(),
            location: "Milan, Italy".to_owned(),
            verified: true,
            active_listings: 0,
        },
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> AdminStore {
        let bus = ChangeBus::new();
        AdminStore::new(Arc::new(MemoryStorage::new(bus.clone())), bus)
    }

    #[test]
    fn test_login_with_demo_credentials() {
        let store = store();
        assert!(!store.is_logged_in());

        assert!(store.login("admin@vintly.com", "admin123"));
        assert!(store.is_logged_in());
    }

    #[test]
    fn test_login_rejects_wrong_credentials() {
        let store = store();
        assert!(!store.login("admin@vintly.com", "nope"));
        assert!(!store.login("someone@else.com", "admin123"));
        assert!(!store.is_logged_in());
    }

    #[test]
    fn test_logout_clears_flag() {
        let store = store();
        store.login("admin@vintly.com", "admin123");

        store.logout();

        assert!(!store.is_logged_in());
    }

    #[test]
    fn test_session_changes_publish_events() {
        let bus = ChangeBus::new();
        let store = AdminStore::new(Arc::new(MemoryStorage::new(bus.clone())), bus.clone());
        let mut rx = bus.subscribe();

        store.login("admin@vintly.com", "admin123");

        let mut saw = false;
        while let Ok(event) = rx.try_recv() {
            if event == StoreEvent::AdminSessionChanged {
                saw = true;
            }
        }
        assert!(saw);
    }

    #[test]
    fn test_fixtures_cover_every_status() {
        let store = store();
        let orders = store.sample_orders();
        assert_eq!(orders.len(), 5);
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert!(orders.iter().any(|o| o.status == status));
        }

        let sellers = store.sample_sellers();
        assert_eq!(sellers.len(), 5);
        for status in [
            SellerStatus::Active,
            SellerStatus::Pending,
            SellerStatus::Suspended,
        ] {
            assert!(sellers.iter().any(|s| s.status == status));
        }
    }

    #[test]
    fn test_pickup_order_has_no_address() {
        let store = store();
        let pickup = store
            .sample_orders()
            .into_iter()
            .find(|o| o.shipping_method == FulfillmentMethod::Pickup)
            .unwrap();
        assert!(pickup.shipping_address.is_none());
    }
}
