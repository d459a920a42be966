pub mod organizations;
pub mod users;
pub mod org_members;

// Analytics entities
pub mod events;

// Dashboard entities
pub mod dashboards;
pub mod widgets;

// Data source entities
pub mod datasource_type;
pub mod datasources;

pub mod prelude;
