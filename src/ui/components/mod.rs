pub mod efficiency_badge;
pub mod item_row;
pub mod kpi_card;
pub mod package_card;
pub mod package_detail;
pub mod toast;
