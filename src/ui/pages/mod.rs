pub mod items;
pub mod packages;
pub mod settings;

pub use items::ItemsPage;
pub use packages::PackagesPage;
pub use settings::SettingsPage;
