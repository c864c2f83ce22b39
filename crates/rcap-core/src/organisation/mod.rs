pub mod model;

pub use model::{NewOrganisation, Organisation, OrganisationFilters, OrganisationPatch, OrganisationType};
