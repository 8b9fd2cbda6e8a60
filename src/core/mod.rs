pub mod api;
pub mod breadcrumbs;
pub mod export;
pub mod modal;
pub mod notify;
pub mod order_form;
pub mod table;
pub mod wizard;

pub use crate::domain::model::{Envelope, Page, Pagination, Record, Resource};
pub use crate::domain::ports::{CallOrderBackend, ConfigProvider, Storage};
pub use crate::utils::error::Result;
