pub mod fetch_client;
pub mod mutation;
pub mod query_cache;
pub mod stats;
pub mod toast;
pub mod transport;

pub use fetch_client::{notification_path, FetchClient, NOTIFICATIONS_PATH};
pub use mutation::{MutationController, Outcome, PendingMutation};
pub use query_cache::{QueryCache, QueryKey, QuerySnapshot, QueryStatus};
pub use stats::{CacheStats, StatsCollector};
pub use toast::{Toast, ToastLevel, ToastReceiver, Toaster};
pub use transport::{HttpTransport, Method, RawResponse, ReqwestTransport};
