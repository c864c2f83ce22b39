//! Organisation hierarchy (federal, state, local).

use crate::loading::LoadingFlag;
use rcap_core::envelope::Envelope;
use rcap_core::error::Result;
use rcap_core::organisation::{NewOrganisation, Organisation, OrganisationFilters, OrganisationPatch};
use rcap_core::user::User;
use rcap_interaction::ApiClient;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct OrganisationState {
    organisations: Vec<Organisation>,
    current: Option<Organisation>,
}

pub struct OrganisationStore {
    client: Arc<ApiClient>,
    state: RwLock<OrganisationState>,
    loading: LoadingFlag,
}

impl OrganisationStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            state: RwLock::new(OrganisationState::default()),
            loading: LoadingFlag::new(),
        }
    }

    pub fn loading(&self) -> bool {
        self.loading.get()
    }

    pub async fn organisations(&self) -> Vec<Organisation> {
        self.state.read().await.organisations.clone()
    }

    pub async fn current_organisation(&self) -> Option<Organisation> {
        self.state.read().await.current.clone()
    }

    pub async fn fetch_organisations(&self, filters: &OrganisationFilters) -> Result<Vec<Organisation>> {
        let _loading = self.loading.begin();
        let organisations = self
            .client
            .get_with::<Envelope<Vec<Organisation>>, _>("/organisations", filters)
            .await?
            .into_inner();

        self.state.write().await.organisations = organisations.clone();
        Ok(organisations)
    }

    pub async fn fetch_organisation(&self, id: u64) -> Result<Organisation> {
        let _loading = self.loading.begin();
        let organisation = self
            .client
            .get::<Envelope<Organisation>>(&format!("/organisations/{}", id))
            .await?
            .into_inner();

        self.state.write().await.current = Some(organisation.clone());
        Ok(organisation)
    }

    /// Creates an organisation and appends it to the list.
    pub async fn create_organisation(&self, data: &NewOrganisation) -> Result<Organisation> {
        let _loading = self.loading.begin();
        let organisation = self
            .client
            .post::<Envelope<Organisation>, _>("/organisations", data)
            .await?
            .into_inner();

        self.state.write().await.organisations.push(organisation.clone());
        Ok(organisation)
    }

    pub async fn update_organisation(&self, id: u64, patch: &OrganisationPatch) -> Result<Organisation> {
        let _loading = self.loading.begin();
        let organisation = self
            .client
            .put::<Envelope<Organisation>, _>(&format!("/organisations/{}", id), patch)
            .await?
            .into_inner();

        let mut state = self.state.write().await;
        if let Some(slot) = state.organisations.iter_mut().find(|org| org.id == id) {
            *slot = organisation.clone();
        }
        Ok(organisation)
    }

    /// Members of an organisation. Not cached.
    pub async fn fetch_organisation_users(&self, id: u64) -> Result<Vec<User>> {
        let _loading = self.loading.begin();
        let users = self
            .client
            .get::<Envelope<Vec<User>>>(&format!("/organisations/{}/users", id))
            .await?
            .into_inner();
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Harness, user_with_role};
    use rcap_core::organisation::OrganisationType;
    use rcap_core::user::Role;
    use rcap_interaction::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_create_update() {
        let h = Harness::signed_in(user_with_role(1, Role::SuperAdmin)).await;
        h.transport
            .respond(
                Method::Get,
                "/organisations",
                200,
                json!([
                    { "id": 1, "name": "Federal", "type": "federal",
                      "children": [{ "id": 2, "name": "Lagos", "type": "state", "parent_id": 1 }] },
                    { "id": 2, "name": "Lagos", "type": "state", "parent_id": 1 }
                ]),
            )
            .respond(
                Method::Post,
                "/organisations",
                201,
                json!({ "id": 3, "name": "Ikeja", "type": "local", "parent_id": 2 }),
            )
            .respond(
                Method::Put,
                "/organisations/2",
                200,
                json!({ "data": { "id": 2, "name": "Lagos State", "type": "state", "parent_id": 1 } }),
            );
        let store = OrganisationStore::new(h.client.clone());

        let organisations = store
            .fetch_organisations(&OrganisationFilters {
                parent_id: None,
                organisation_type: Some(OrganisationType::State),
            })
            .await
            .unwrap();
        assert_eq!(organisations[0].children.as_ref().unwrap().len(), 1);

        store
            .create_organisation(&NewOrganisation {
                name: "Ikeja".to_string(),
                organisation_type: OrganisationType::Local,
                parent_id: Some(2),
                description: None,
            })
            .await
            .unwrap();
        store
            .update_organisation(
                2,
                &OrganisationPatch {
                    name: Some("Lagos State".to_string()),
                    ..OrganisationPatch::default()
                },
            )
            .await
            .unwrap();

        let names: Vec<String> = store
            .organisations()
            .await
            .into_iter()
            .map(|org| org.name)
            .collect();
        assert_eq!(names, vec!["Federal", "Lagos State", "Ikeja"]);
        let sent = &h.transport.requests_to(Method::Get, "/organisations")[0];
        assert_eq!(sent.query_value("type"), Some("state"));
    }

    #[tokio::test]
    async fn test_users_are_returned_not_stored() {
        let h = Harness::signed_in(user_with_role(1, Role::Admin)).await;
        h.transport.respond(
            Method::Get,
            "/organisations/4/users",
            200,
            json!({ "data": [{ "id": 8, "name": "Bola", "role": "user" }] }),
        );
        let store = OrganisationStore::new(h.client.clone());

        let users = store.fetch_organisation_users(4).await.unwrap();

        assert_eq!(users[0].id, 8);
        assert!(store.organisations().await.is_empty());
    }
}
