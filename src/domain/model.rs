use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::utils::error::AdminError;

/// Uniform response wrapper returned by every backend endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: u16,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u32,
}

/// One page of a list endpoint.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub pagination: Option<Pagination>,
}

/// Untyped row for collections without a dedicated DTO.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(flatten)]
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    /// Field as display text: strings unquoted, null as empty.
    pub fn field_text(&self, key: &str) -> String {
        match self.data.get(key) {
            None | Some(serde_json::Value::Null) => String::new(),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Applications,
    Groups,
    Buyers,
    Sellers,
    Gopas,
    Mepas,
    CallOrders,
    Bids,
    Requests,
}

impl Resource {
    pub const ALL: [Resource; 9] = [
        Resource::Applications,
        Resource::Groups,
        Resource::Buyers,
        Resource::Sellers,
        Resource::Gopas,
        Resource::Mepas,
        Resource::CallOrders,
        Resource::Bids,
        Resource::Requests,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Resource::Applications => "applications",
            Resource::Groups => "groups",
            Resource::Buyers => "buyers",
            Resource::Sellers => "sellers",
            Resource::Gopas => "gopas",
            Resource::Mepas => "mepas",
            Resource::CallOrders => "call-orders",
            Resource::Bids => "bids",
            Resource::Requests => "requests",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Resource {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Resource::ALL
            .into_iter()
            .find(|r| r.path() == wanted)
            .ok_or_else(|| AdminError::InvalidConfigValueError {
                field: "resource".to_string(),
                value: s.to_string(),
                reason: format!(
                    "Unknown resource. Valid resources: {}",
                    Resource::ALL.map(|r| r.path()).join(", ")
                ),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buyer {
    pub id: String,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub member_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BidStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: String,
    pub call_order_id: String,
    pub seller_id: String,
    pub amount: f64,
    pub status: BidStatus,
}

/// Order payload built by the call-order wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCallOrder {
    pub buyer_id: String,
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub delivery_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallOrder {
    pub id: String,
    pub buyer_id: String,
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub delivery_address: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
