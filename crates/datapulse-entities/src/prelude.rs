pub use super::dashboards::Entity as Dashboards;
pub use super::datasources::Entity as Datasources;
pub use super::events::Entity as Events;
pub use super::org_members::Entity as OrgMembers;
pub use super::organizations::Entity as Organizations;
pub use super::users::Entity as Users;
pub use super::widgets::Entity as Widgets;
