//
//  wsapi-client
//  session.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # WSAPI Session
//!
//! [`Session`] is the public entry point: one method per WSAPI resource, each
//! building the resource URL, issuing the request through the authenticated
//! transport, and mapping the response into typed models.
//!
//! ## Resource URLs
//!
//! Every resource lives under `<WSAPI_URL>/v<version>/`, for example
//! `https://rally1.rallydev.com/slm/webservice/v3.0/Project/1/Editors`.
//!
//! ## Query parameters
//!
//! | Parameter | Sent | Default |
//! |-----------|------|---------|
//! | `workspace` | when a workspace id is set | - |
//! | `query` | only when a filter is given | - |
//! | `start` | always | `1` |
//! | `pagesize` | always | `200` (single reads), `100` (paged reads) |
//! | `fetch` | always | `true` |
//!
//! ## Example
//!
//! ```rust,no_run
//! use wsapi_client::models::WsapiEntity;
//! use wsapi_client::{QueryOptions, Session};
//!
//! # async fn example() -> wsapi_client::api::common::Result<()> {
//! let mut session = Session::new("my-api-key")?.with_workspace_id("12345");
//!
//! let user = session.get_current_user().await?;
//! println!("Logged in as {:?}", user.name());
//!
//! for project in session.get_projects(&QueryOptions::new()).await? {
//!     println!("{:?}", project.name());
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt::Display;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

use crate::api::client::{WsapiClient, WsapiRequest};
use crate::api::common::{
    fetch_all_pages, PageQuery, PageSource, QueryOptions, RawResponse, Result, DEFAULT_PAGE_SIZE,
};
use crate::api::mapper::{map_many, map_single, update_envelope};
use crate::auth::{Credential, RefreshBundle};
use crate::config::{default_auth_url, default_wsapi_url, Config};
use crate::models::WsapiObject;
use crate::util::join_url;

/// API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "3.0";

/// A WSAPI session bound to one credential.
///
/// The credential may be replaced in place by a token refresh. All resource
/// methods take `&mut self` for that reason and run their HTTP round-trips
/// one after another.
#[derive(Debug)]
pub struct Session {
    client: WsapiClient,
    wsapi_url: String,
    api_version: String,
    workspace_id: Option<String>,
}

impl Session {
    /// Creates a session for `token` against the default WSAPI URL
    /// (`WSAPI_URL` if set) and API version `3.0`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client could not be created.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: WsapiClient::new(Credential::new(token))?.with_auth_url(default_auth_url()),
            wsapi_url: default_wsapi_url(),
            api_version: DEFAULT_API_VERSION.to_string(),
            workspace_id: None,
        })
    }

    /// Creates a session from a loaded [`Config`].
    ///
    /// When the config carries OAuth client credentials and a refresh token
    /// is given, refresh-and-retry is enabled.
    pub fn from_config(
        config: &Config,
        token: impl Into<String>,
        refresh_token: Option<&str>,
    ) -> Result<Self> {
        let mut session = Self::new(token)?
            .with_wsapi_url(config.wsapi_url.clone())
            .with_auth_url(config.auth_url.clone())
            .with_version(config.api_version.clone())
            .with_timeout(config.timeout());
        session.workspace_id = config.workspace_id.clone();

        if let (Some(oauth), Some(refresh_token)) = (&config.oauth, refresh_token) {
            session.setup_refresh_token(&oauth.client_id, &oauth.client_secret, refresh_token);
        }

        Ok(session)
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_workspace_id(mut self, workspace_id: impl Into<String>) -> Self {
        self.workspace_id = Some(workspace_id.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = self.client.with_timeout(timeout);
        self
    }

    pub fn with_wsapi_url(mut self, wsapi_url: impl Into<String>) -> Self {
        self.wsapi_url = wsapi_url.into();
        self
    }

    pub fn with_auth_url(mut self, auth_url: impl Into<String>) -> Self {
        self.client = self.client.with_auth_url(auth_url);
        self
    }

    /// Enables transparent access-token refresh.
    pub fn setup_refresh_token(
        &mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) {
        self.set_refresh_bundle(RefreshBundle::new(client_id, client_secret, refresh_token));
    }

    /// Enables transparent access-token refresh with a prepared bundle, e.g.
    /// one carrying a rotation callback.
    pub fn set_refresh_bundle(&mut self, bundle: RefreshBundle) {
        self.client.set_refresh_bundle(bundle);
    }

    pub fn refresh_bundle(&self) -> Option<&RefreshBundle> {
        self.client.refresh_bundle()
    }

    /// The credential currently in use. Changes after a token refresh.
    pub fn credential(&self) -> &Credential {
        self.client.credential()
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn workspace_id(&self) -> Option<&str> {
        self.workspace_id.as_deref()
    }

    pub fn set_workspace_id(&mut self, workspace_id: Option<String>) {
        self.workspace_id = workspace_id;
    }

    /// The subscription of the authenticated user.
    pub async fn get_user_subscription(&mut self) -> Result<WsapiObject> {
        self.get_object("Subscription").await
    }

    pub async fn get_subscription(&mut self, id: impl Display) -> Result<WsapiObject> {
        self.get_object(&format!("Subscription/{}", id)).await
    }

    /// All projects visible to the user, across every page.
    pub async fn get_projects(&mut self, options: &QueryOptions) -> Result<Vec<WsapiObject>> {
        self.get_all_pages("Project", options).await
    }

    pub async fn get_project(&mut self, id: impl Display) -> Result<WsapiObject> {
        self.get_object(&format!("Project/{}", id)).await
    }

    /// The authenticated user. Sends no `query`, which would list every user.
    pub async fn get_current_user(&mut self) -> Result<WsapiObject> {
        self.get_object("User").await
    }

    pub async fn get_user(&mut self, id: impl Display) -> Result<WsapiObject> {
        self.get_object(&format!("User/{}", id)).await
    }

    /// Looks a user up by login name. Returns `None` when nobody matches.
    pub async fn get_user_by_username(&mut self, username: &str) -> Result<Option<WsapiObject>> {
        let options = QueryOptions::new()
            .with_query(format!("(UserName = \"{}\")", username))
            .with_pagesize(1);
        let request = self.get_request(&self.resource_url("User"), &options, None);
        let response = self.client.execute(&request).await?;

        Ok(map_many(&response)?.into_iter().next())
    }

    /// Users matching a filter such as `EmailAddress = someone@example.com`.
    /// The filter is wrapped in parentheses before it is sent.
    pub async fn get_users(&mut self, query: &str, options: &QueryOptions) -> Result<Vec<WsapiObject>> {
        let options = options.clone().with_query(format!("({})", query));
        self.get_all_pages("User", &options).await
    }

    /// Team members of a project, across every page.
    pub async fn get_team_members(
        &mut self,
        project_id: impl Display,
        options: &QueryOptions,
    ) -> Result<Vec<WsapiObject>> {
        self.get_all_pages(&format!("Project/{}/TeamMembers", project_id), options)
            .await
    }

    /// Editors of a project, across every page.
    pub async fn get_editors(
        &mut self,
        project_id: impl Display,
        options: &QueryOptions,
    ) -> Result<Vec<WsapiObject>> {
        self.get_all_pages(&format!("Project/{}/Editors", project_id), options)
            .await
    }

    /// Applies a partial update to an artifact and returns the updated object.
    ///
    /// `fields` is forwarded as-is inside `{"<resource_type>": fields}`.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use serde_json::{json, Map};
    /// use wsapi_client::Session;
    ///
    /// # async fn example(session: &mut Session) -> wsapi_client::api::common::Result<()> {
    /// let mut fields = Map::new();
    /// fields.insert("Owner".to_string(), json!("/user/42"));
    /// session.update_artifact("defect", "1234", fields).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn update_artifact(
        &mut self,
        resource_type: &str,
        id: impl Display,
        fields: Map<String, Value>,
    ) -> Result<WsapiObject> {
        let url = self.resource_url(&format!("{}/{}", resource_type, id));
        let request = WsapiRequest::post(url, update_envelope(resource_type, fields));
        let response = self.client.execute(&request).await?;

        map_single(&response)
    }

    async fn get_object(&mut self, resource: &str) -> Result<WsapiObject> {
        let request = self.get_request(&self.resource_url(resource), &QueryOptions::new(), None);
        let response = self.client.execute(&request).await?;

        map_single(&response)
    }

    async fn get_all_pages(&mut self, resource: &str, options: &QueryOptions) -> Result<Vec<WsapiObject>> {
        let url = self.resource_url(resource);
        debug!(%url, "fetching all pages");

        let mut pages = ResourcePages {
            session: self,
            url,
            options: options.clone(),
        };
        fetch_all_pages(options, &mut pages).await
    }

    fn resource_url(&self, resource: &str) -> String {
        let version = format!("v{}", self.api_version);
        join_url(&[self.wsapi_url.as_str(), version.as_str(), resource])
    }

    fn workspace_url(&self) -> Option<String> {
        self.workspace_id
            .as_ref()
            .map(|id| self.resource_url(&format!("Workspace/{}", id)))
    }

    /// Builds a GET with the standard parameters. `page` overrides the
    /// start and page size from `options`.
    fn get_request(&self, url: &str, options: &QueryOptions, page: Option<PageQuery>) -> WsapiRequest {
        let mut request = WsapiRequest::get(url);

        if let Some(workspace) = self.workspace_url() {
            request = request.param("workspace", workspace);
        }
        if let Some(query) = &options.query {
            request = request.param("query", query);
        }

        let start = page.map(|p| p.start).or(options.start).unwrap_or(1);
        let pagesize = page
            .map(|p| p.pagesize)
            .or(options.pagesize)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        request
            .param("start", start)
            .param("pagesize", pagesize)
            .param("fetch", options.fetch.unwrap_or(true))
    }
}

/// Pages of one resource, fetched through a session.
struct ResourcePages<'a> {
    session: &'a mut Session,
    url: String,
    options: QueryOptions,
}

#[async_trait]
impl PageSource for ResourcePages<'_> {
    async fn fetch_page(&mut self, page: PageQuery) -> Result<RawResponse> {
        let request = self.session.get_request(&self.url, &self.options, Some(page));
        self.session.client.execute(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new("deadbeefdeadbeef")
            .unwrap()
            .with_wsapi_url("https://rally1.rallydev.com/slm/webservice/")
    }

    fn params(request: &WsapiRequest) -> Vec<(&str, &str)> {
        request
            .params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn test_resource_url() {
        let session = session();
        assert_eq!(
            session.resource_url("Project/1/Editors"),
            "https://rally1.rallydev.com/slm/webservice/v3.0/Project/1/Editors"
        );
        let session = session.with_version("2.0");
        assert_eq!(
            session.resource_url("User"),
            "https://rally1.rallydev.com/slm/webservice/v2.0/User"
        );
    }

    #[test]
    fn test_default_get_params_omit_query() {
        let session = session();
        let request = session.get_request("https://x/User", &QueryOptions::new(), None);
        assert_eq!(
            params(&request),
            [("start", "1"), ("pagesize", "200"), ("fetch", "true")]
        );
    }

    #[test]
    fn test_workspace_param_points_at_workspace_url() {
        let session = session().with_workspace_id("777");
        let request = session.get_request("https://x/User", &QueryOptions::new(), None);
        assert_eq!(
            params(&request)[0],
            (
                "workspace",
                "https://rally1.rallydev.com/slm/webservice/v3.0/Workspace/777"
            )
        );
    }

    #[test]
    fn test_page_overrides_options() {
        let session = session();
        let options = QueryOptions::new()
            .with_start(1)
            .with_pagesize(1)
            .with_query("(Name = x)");
        let request = session.get_request(
            "https://x/Project",
            &options,
            Some(PageQuery { start: 3, pagesize: 1 }),
        );
        assert_eq!(
            params(&request),
            [
                ("query", "(Name = x)"),
                ("start", "3"),
                ("pagesize", "1"),
                ("fetch", "true")
            ]
        );
    }

    #[test]
    fn test_defaults() {
        let session = session();
        assert_eq!(session.api_version(), "3.0");
        assert_eq!(session.workspace_id(), None);
        assert!(session.refresh_bundle().is_none());
        assert_eq!(session.credential().as_str(), "deadbeefdeadbeef");
    }
}
