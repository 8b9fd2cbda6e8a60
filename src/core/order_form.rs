use crate::domain::model::NewCallOrder;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, FieldErrors,
};

pub const MAX_QUANTITY: u32 = 100_000;
pub const MAX_ADDRESS_LEN: usize = 200;
pub const MAX_NOTES_LEN: usize = 500;

/// Order-details form as typed by the agent. Every field is kept as raw text
/// so a rejected draft can be shown back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDraft {
    pub product_id: String,
    pub quantity: String,
    pub unit_price: String,
    pub delivery_address: String,
    pub notes: String,
}

/// A draft that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetails {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub delivery_address: String,
    pub notes: Option<String>,
}

impl OrderDraft {
    pub fn validate(&self) -> Result<OrderDetails, FieldErrors> {
        let mut errors = FieldErrors::new();

        let product_id = self.product_id.trim();
        errors.check("productId", validate_non_empty_string("productId", product_id));

        let quantity = match self.quantity.trim().parse::<u32>() {
            Ok(q) => {
                errors.check("quantity", validate_positive_number("quantity", q as usize, 1));
                errors.check("quantity", validate_range("quantity", q, 1, MAX_QUANTITY));
                q
            }
            Err(_) => {
                errors.add("quantity", "Enter a whole number");
                0
            }
        };

        let unit_price = match self.unit_price.trim().parse::<f64>() {
            Ok(p) if p.is_finite() && p > 0.0 => p,
            Ok(_) => {
                errors.add("unitPrice", "Price must be greater than zero");
                0.0
            }
            Err(_) => {
                errors.add("unitPrice", "Enter a valid amount");
                0.0
            }
        };

        let delivery_address = self.delivery_address.trim();
        errors.check(
            "deliveryAddress",
            validate_non_empty_string("deliveryAddress", delivery_address),
        );
        if delivery_address.chars().count() > MAX_ADDRESS_LEN {
            errors.add(
                "deliveryAddress",
                format!("At most {} characters", MAX_ADDRESS_LEN),
            );
        }

        let notes = self.notes.trim();
        if notes.chars().count() > MAX_NOTES_LEN {
            errors.add("notes", format!("At most {} characters", MAX_NOTES_LEN));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(OrderDetails {
            product_id: product_id.to_string(),
            quantity,
            unit_price,
            delivery_address: delivery_address.to_string(),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }
}

impl OrderDetails {
    pub fn total(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }

    pub fn to_new_order(&self, buyer_id: &str) -> NewCallOrder {
        NewCallOrder {
            buyer_id: buyer_id.to_string(),
            product_id: self.product_id.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price,
            delivery_address: self.delivery_address.clone(),
            notes: self.notes.clone(),
        }
    }
}
