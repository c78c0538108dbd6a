use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Key sets are trusted for an hour before being fetched again
const JWKS_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Minimum spacing between fetches triggered by an unknown `kid`
const JWKS_REFETCH_INTERVAL: Duration = Duration::from_secs(60);

const JWKS_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Clock skew tolerated when checking `exp` and `nbf`
const LEEWAY_SECS: u64 = 5;

/// Claims extracted from a verified session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    pub user_id: String,
    pub session_id: Option<String>,
}

/// Verifies the session token presented by a browser.
#[async_trait::async_trait]
pub trait SessionVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<SessionClaims, String>;
}

/// Internal JWT claims structure for a Clerk session token
#[derive(Debug, Serialize, Deserialize)]
struct SessionTokenClaims {
    sub: String,
    sid: Option<String>,
    azp: Option<String>,
    exp: u64,
}

/// JWKS key published by Clerk
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct JwkKey {
    kid: String,
    n: String,
    e: String,
    kty: String,
    alg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JwksResponse {
    keys: Vec<JwkKey>,
}

/// Signing keys by `kid`, as of the last fetch
struct KeySet {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Instant,
}

impl KeySet {
    /// `None` when the set is too old to answer for `kid` and must be refetched.
    fn lookup(&self, kid: &str) -> Option<Result<DecodingKey, String>> {
        let age = self.fetched_at.elapsed();
        if age >= JWKS_CACHE_TTL {
            return None;
        }
        match self.keys.get(kid) {
            Some(key) => Some(Ok(key.clone())),
            None if age < JWKS_REFETCH_INTERVAL => Some(Err(unknown_kid(kid))),
            None => None,
        }
    }
}

fn unknown_kid(kid: &str) -> String {
    format!("Key with kid '{}' not found in JWKS", kid)
}

/// Clerk session token verifier with JWKS caching
#[derive(Clone)]
pub struct ClerkTokenVerifier {
    client: Client,
    jwks_url: String,
    issuer: Option<String>,
    authorized_parties: Vec<String>,
    key_set: Arc<RwLock<Option<KeySet>>>,
}

impl ClerkTokenVerifier {
    pub fn new(jwks_url: String) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(JWKS_FETCH_TIMEOUT).build()?;
        Ok(Self {
            client,
            jwks_url,
            issuer: None,
            authorized_parties: Vec::new(),
            key_set: Arc::new(RwLock::new(None)),
        })
    }

    /// Require the `iss` claim to match.
    pub fn with_issuer(mut self, issuer: Option<String>) -> Self {
        self.issuer = issuer;
        self
    }

    /// Origins accepted in the `azp` claim. Empty accepts any origin.
    pub fn with_authorized_parties(mut self, parties: Vec<String>) -> Self {
        self.authorized_parties = parties;
        self
    }

    async fn get_decoding_key(&self, kid: &str) -> Result<DecodingKey, String> {
        if let Some(found) = self.key_set.read().await.as_ref().and_then(|s| s.lookup(kid)) {
            return found;
        }

        let keys = self.fetch_keys().await?;
        let found = keys.get(kid).cloned().ok_or_else(|| unknown_kid(kid));
        *self.key_set.write().await = Some(KeySet {
            keys,
            fetched_at: Instant::now(),
        });
        found
    }

    async fn fetch_keys(&self) -> Result<HashMap<String, DecodingKey>, String> {
        tracing::debug!("Fetching JWKS from {}", self.jwks_url);
        let jwks: JwksResponse = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| format!("Failed to fetch JWKS: {}", e))?
            .json()
            .await
            .map_err(|e| format!("Failed to parse JWKS: {}", e))?;

        Ok(jwks
            .keys
            .iter()
            .filter_map(|key| match Self::jwk_to_decoding_key(key) {
                Ok(decoding_key) => Some((key.kid.clone(), decoding_key)),
                Err(e) => {
                    tracing::warn!("Skipping JWKS key {}: {}", key.kid, e);
                    None
                }
            })
            .collect())
    }

    fn jwk_to_decoding_key(key: &JwkKey) -> Result<DecodingKey, String> {
        if key.kty != "RSA" {
            return Err(format!("Unsupported key type: {}", key.kty));
        }
        DecodingKey::from_rsa_components(&key.n, &key.e)
            .map_err(|e| format!("Failed to create decoding key: {}", e))
    }

    fn check_authorized_party(&self, azp: Option<&str>) -> Result<(), String> {
        match azp {
            Some(azp)
                if !self.authorized_parties.is_empty()
                    && !self.authorized_parties.iter().any(|p| p == azp) =>
            {
                Err(format!("Unauthorized party: {}", azp))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl SessionVerifier for ClerkTokenVerifier {
    async fn verify(&self, token: &str) -> Result<SessionClaims, String> {
        // Decode header to get kid
        let header = decode_header(token).map_err(|e| format!("Invalid token header: {}", e))?;
        let kid = header.kid.ok_or("Token missing kid header")?;

        let decoding_key = self.get_decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = LEEWAY_SECS;
        validation.validate_nbf = true;
        // Session tokens carry no audience.
        validation.validate_aud = false;
        if let Some(ref issuer) = self.issuer {
            validation.set_issuer(&[issuer]);
        }

        let token_data = decode::<SessionTokenClaims>(token, &decoding_key, &validation)
            .map_err(|e| format!("Token validation failed: {}", e))?;

        let claims = token_data.claims;
        self.check_authorized_party(claims.azp.as_deref())?;

        Ok(SessionClaims {
            user_id: claims.sub,
            session_id: claims.sid,
        })
    }
}
