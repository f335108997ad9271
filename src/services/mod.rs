pub mod delivery_service;
pub mod fetch_service;
pub mod notification_service;

pub use delivery_service::{DeliveryOptions, DeliveryService, RunOutcome};
pub use fetch_service::{pick_random, FetchService};
pub use notification_service::{ConsoleNotifier, NotificationService, Notifier};
