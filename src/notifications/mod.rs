//! In-app notifications.
//!
//! Every notification is a row owned by one user. Creating one also resolves
//! which external channels the user's settings would allow; nothing is sent
//! anywhere, the plan is only logged and returned.

pub mod channels;
pub mod manager;

pub use channels::DeliveryPlan;
pub use manager::{NewNotification, NotificationManager, NotificationPage};
