use crate::errors::AppError;
use crate::models::{Counselor, CounselorMeta, CounselorProfile};
use crate::store::DocumentStore;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Normalizes an email for comparison: surrounding whitespace and letter
/// case are not significant.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Credential check capability.
///
/// The production check today is length-only (see [`PasswordLengthVerifier`]);
/// keeping it behind a trait means a salted-hash implementation can be
/// substituted without touching the login flow.
pub trait CredentialVerifier: Send + Sync {
    /// Whether `password` is acceptable for `counselor`.
    fn verify(&self, counselor: &Counselor, password: &str) -> bool;
}

/// Accepts any password of at least [`MIN_PASSWORD_LEN`] characters for an
/// existing counselor. This is the entire check: no hash comparison is
/// performed. Known weakness carried over from the source system on purpose;
/// do not harden silently.
#[derive(Debug, Default, Clone, Copy)]
pub struct PasswordLengthVerifier;

impl CredentialVerifier for PasswordLengthVerifier {
    fn verify(&self, _counselor: &Counselor, password: &str) -> bool {
        // Character count, not byte count: a short non-ASCII password must
        // not slip through on its UTF-8 width.
        password.chars().count() >= MIN_PASSWORD_LEN
    }
}

/// Selects the first counselor whose normalized email equals the normalized
/// input, in collection iteration order.
///
/// The store does not enforce email uniqueness, so duplicates are possible;
/// first match wins and the rule is deterministic, but which record that is
/// for a duplicated email is up to the store's ordering.
pub fn find_by_email<'a>(counselors: &'a [Counselor], email: &str) -> Option<&'a Counselor> {
    let wanted = normalize_email(email);
    counselors.iter().find(|c| {
        c.metadata
            .email
            .as_deref()
            .map(|e| normalize_email(e) == wanted)
            .unwrap_or(false)
    })
}

/// Counselor login flow: input rules, credential lookup, verifier gate.
pub struct AuthService<V = PasswordLengthVerifier> {
    store: DocumentStore,
    verifier: V,
}

impl AuthService<PasswordLengthVerifier> {
    pub fn new(store: DocumentStore) -> Self {
        Self {
            store,
            verifier: PasswordLengthVerifier,
        }
    }
}

impl<V: CredentialVerifier> AuthService<V> {
    #[allow(dead_code)]
    pub fn with_verifier(store: DocumentStore, verifier: V) -> Self {
        Self { store, verifier }
    }

    /// Validates a login attempt and returns the reduced counselor
    /// projection on success. Read-only: no session state is created.
    ///
    /// Failure modes, in order:
    /// - empty/absent email or password → [`AppError::Validation`]
    /// - counselor collection missing upstream → [`AppError::NotFound`]
    ///   (distinct from a credential mismatch)
    /// - no email match, or verifier rejection → the same generic
    ///   [`AppError::Auth`], so responses never leak whether the email
    ///   matched
    pub async fn login(
        &self,
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<CounselorProfile, AppError> {
        let email = email.unwrap_or_default();
        let password = password.unwrap_or_default();

        if email.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let counselors: Vec<Counselor> = self
            .store
            .find::<CounselorMeta>("counselors", 0)
            .await
            .map_err(|e| match e {
                AppError::NotFound(_) => {
                    AppError::NotFound("No counselors configured".to_string())
                }
                other => other,
            })?;

        let counselor = find_by_email(&counselors, email)
            .ok_or_else(|| AppError::Auth("Invalid email or password".to_string()))?;

        if !self.verifier.verify(counselor, password) {
            return Err(AppError::Auth("Invalid email or password".to_string()));
        }

        tracing::info!("Counselor {} logged in", counselor.id);
        Ok(CounselorProfile::from_counselor(counselor))
    }
}
