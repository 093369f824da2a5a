//! Consumer key issuance
//!
//! `POST /auth/credential` is the only unsigned call besides the time
//! endpoint: no consumer key exists yet, so only the application key is
//! sent. The key comes back in `pendingValidation` state and stays unusable
//! until the user opens the validation URL and logs in. This client cannot
//! observe that step; signed calls simply fail with 403 until it happens.

use ovh_auth::{CredentialGrant, CredentialRequest, Method};
use tracing::{info, instrument};

use crate::client::{check_status, decode_body, OvhClient, CONTENT_TYPE_JSON, HEADER_APPLICATION, HEADER_CONTENT_TYPE};
use crate::error::{OvhError, OvhResult};
use crate::transport::{HttpRequest, Transport};

pub(crate) const CREDENTIAL_PATH: &str = "/auth/credential";

impl<T: Transport> OvhClient<T> {
    /// Ask the API for a new consumer key
    ///
    /// On success the issued key replaces the client's current consumer
    /// key and is used to sign every later call. On failure the client is
    /// left untouched.
    ///
    /// # Errors
    /// - [`OvhError::Api`] if the API refuses the request
    /// - [`OvhError::MalformedResponse`] if either the grant or the error
    ///   body cannot be parsed
    /// - [`OvhError::Transport`] if nothing came back
    #[instrument(skip_all, fields(rules = request.access_rules.len()))]
    pub async fn request_consumer_key(
        &mut self,
        request: CredentialRequest,
    ) -> OvhResult<CredentialGrant> {
        let body = serde_json::to_vec(&request).map_err(OvhError::Serialize)?;

        let http_request = HttpRequest::new(Method::Post, self.url(CREDENTIAL_PATH))
            .header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON)
            .header(HEADER_APPLICATION, self.credentials.application_key())
            .with_body(body);

        let response = check_status(self.transport.execute(http_request).await?)?;
        let grant: CredentialGrant = decode_body(&response)?
            .ok_or_else(|| OvhError::malformed(response.status, "empty credential response"))?;

        self.credentials.set_consumer_key(grant.consumer_key.clone());

        info!(
            state = ?grant.state,
            validation_url = %grant.validation_url,
            "Consumer key issued, waiting for validation"
        );
        Ok(grant)
    }
}
