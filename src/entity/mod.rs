pub mod admins;
pub mod audit_logs;
pub mod bank_details;
pub mod contact_details;
pub mod order_items;
pub mod orders;
pub mod products;

pub use admins::Entity as Admins;
pub use audit_logs::Entity as AuditLogs;
pub use bank_details::Entity as BankDetails;
pub use contact_details::Entity as ContactDetails;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
