use log::{debug, info};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::{
    error::{BookshelfError, Result},
    models::{ApiEnvelope, BookStatus, CatalogBook, Credentials, ShelfEntry, SignupForm, UserInfo},
    session::{CredentialStore, FileStore, Session},
    sign,
    transport::{ApiRequest, ApiResponse, AuthHeaders, HttpTransport, Transport},
};

pub struct BookshelfClient<T = HttpTransport, S = FileStore> {
    transport: T,
    session: Session<S>,
}

impl<T: Transport, S: CredentialStore> BookshelfClient<T, S> {
    pub fn new(transport: T, session: Session<S>) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub async fn signup(&mut self, form: SignupForm) -> Result<UserInfo> {
        for (field, value) in [
            ("name", &form.name),
            ("email", &form.email),
            ("key", &form.key),
            ("secret", &form.secret),
        ] {
            if value.trim().is_empty() {
                return Err(BookshelfError::validation(format!(
                    "Please enter your {}.",
                    field
                )));
            }
        }

        info!("Registering new user {}", form.key);
        let request = ApiRequest {
            method: Method::POST,
            path: "/signup".to_string(),
            body: Some(serde_json::to_string(&form)?),
            auth: None,
        };
        let user: UserInfo = self.dispatch(request).await?.ok_or_else(missing_data)?;

        self.remember(&user)?;
        Ok(user)
    }

    pub async fn login(&mut self, key: &str, secret: &str) -> Result<UserInfo> {
        let credentials = Credentials::new(key, secret);
        if !credentials.is_complete() {
            return Err(BookshelfError::validation("Please enter both key and secret."));
        }

        info!("Logging in as {}", key);
        let request = signed_request(&credentials, Method::GET, "/myself", None)?;
        let user: UserInfo = self.dispatch(request).await?.ok_or_else(missing_data)?;

        self.remember(&user)?;
        Ok(user)
    }

    /// Saves the pair the server issued. A pair with an empty half would
    /// sign every later request with an empty secret, so it is refused.
    fn remember(&mut self, user: &UserInfo) -> Result<()> {
        let credentials = user.credentials();
        if !credentials.is_complete() {
            return Err(BookshelfError::MalformedResponse(
                serde::de::Error::custom("server returned an incomplete key/secret pair"),
            ));
        }
        self.session.set(credentials)
    }

    pub fn logout(&mut self) -> Result<()> {
        info!("Logging out");
        self.session.clear()
    }

    pub async fn myself(&self) -> Result<UserInfo> {
        self.authorized_request(Method::GET, "/myself", None)
            .await?
            .ok_or_else(missing_data)
    }

    pub async fn fetch_books(&self) -> Result<Vec<ShelfEntry>> {
        Ok(self
            .authorized_request(Method::GET, "/books", None)
            .await?
            .unwrap_or_default())
    }

    pub async fn search_books(&self, title: &str) -> Result<Vec<CatalogBook>> {
        self.require_credentials()?;
        let title = title.trim();
        if title.is_empty() {
            return Err(BookshelfError::validation("Please enter a book title."));
        }

        let path = format!("/books/{}", urlencoding::encode(title));
        Ok(self
            .authorized_request(Method::GET, &path, None)
            .await?
            .unwrap_or_default())
    }

    pub async fn add_book(&self, isbn: &str) -> Result<Option<ShelfEntry>> {
        self.require_credentials()?;
        let isbn = isbn.trim();
        if isbn.is_empty() {
            return Err(BookshelfError::validation("Please enter an ISBN."));
        }

        self.authorized_request(Method::POST, "/books", Some(&json!({ "isbn": isbn })))
            .await
    }

    pub async fn edit_book(&self, id: u64, status: BookStatus) -> Result<Option<ShelfEntry>> {
        self.authorized_request(
            Method::PATCH,
            &format!("/books/{}", id),
            Some(&json!({ "status": status })),
        )
        .await
    }

    pub async fn delete_book(&self, id: u64) -> Result<()> {
        self.authorized_request::<Value>(Method::DELETE, &format!("/books/{}", id), None)
            .await?;
        Ok(())
    }

    /// Signs `method path body` with the session secret and sends it.
    ///
    /// Returns the `data` field of a successful response. Fails with
    /// [`BookshelfError::MissingCredentials`] before touching the network when
    /// the session holds no credentials.
    pub async fn authorized_request<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Option<R>> {
        let credentials = self.require_credentials()?;
        let request = signed_request(credentials, method, path, body)?;
        self.dispatch(request).await
    }

    fn require_credentials(&self) -> Result<&Credentials> {
        self.session
            .credentials()
            .ok_or(BookshelfError::MissingCredentials)
    }

    async fn dispatch<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<Option<R>> {
        debug!("Sending {} {}", request.method, request.path);
        let response = self.transport.send(request).await?;
        decode_response(response)
    }
}

fn signed_request(
    credentials: &Credentials,
    method: Method,
    path: &str,
    body: Option<&Value>,
) -> Result<ApiRequest> {
    let body = body.map(serde_json::to_string).transpose()?;
    let sign = sign::sign(&method, path, body.as_deref().unwrap_or(""), &credentials.secret);

    Ok(ApiRequest {
        method,
        path: path.to_string(),
        body,
        auth: Some(AuthHeaders {
            key: credentials.key.clone(),
            sign,
        }),
    })
}

fn decode_response<R: DeserializeOwned>(response: ApiResponse) -> Result<Option<R>> {
    if !response.is_success() {
        let message = serde_json::from_str::<ApiEnvelope<Value>>(&response.body)
            .ok()
            .and_then(|envelope| envelope.message)
            .unwrap_or_else(|| status_message(response.status));
        return Err(BookshelfError::Api {
            status: response.status,
            message,
        });
    }

    // e.g. 204 No Content from DELETE
    if response.body.trim().is_empty() {
        return Ok(None);
    }

    let envelope: ApiEnvelope<R> = serde_json::from_str(&response.body)?;
    if !envelope.is_ok {
        return Err(BookshelfError::Api {
            status: response.status,
            message: envelope
                .message
                .unwrap_or_else(|| "Request was rejected by the server".to_string()),
        });
    }

    Ok(envelope.data)
}

fn status_message(status: u16) -> String {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed with status {}", status))
}

fn missing_data() -> BookshelfError {
    BookshelfError::MalformedResponse(serde::de::Error::missing_field("data"))
}
