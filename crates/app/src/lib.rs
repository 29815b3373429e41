// Application services built on the configuration model

pub mod app_module;
pub mod message_log;
pub mod properties;
pub mod providers;
pub mod recent_files;

pub use app_module::AppModule;
pub use message_log::{Message, MessageLog, MessageLogObserver, MessageType, Messenger, SubscriptionId};
pub use properties::{TextOptions, UnitSystemSchema};
pub use providers::{DocumentTreeNodePropertiesProvider, NodeInfoProvider, PropertiesProviders};
pub use recent_files::{
    PropertyRecentFiles, RecentFile, RecentFiles, RecentFilesConverter, Thumbnail, THUMBNAIL_SIZE,
};
