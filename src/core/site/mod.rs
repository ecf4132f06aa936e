pub mod equipment;
pub mod floor_site;

pub use equipment::SiteEquipment;
pub use floor_site::FloorSite;
