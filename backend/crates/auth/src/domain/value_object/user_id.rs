use kernel::id::Id;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

pub struct UserMarker;
pub type UserId = Id<UserMarker>;

static FALLBACK_SEQ: AtomicU64 = AtomicU64::new(0);

/// Generate a fresh user id: a random (v4) UUID in hyphenated form.
///
/// If the OS entropy source fails, a time-and-counter id is used instead
/// so that sign-up keeps working. Such ids are unique per process only.
pub fn generate_user_id() -> UserId {
    match platform::crypto::try_random_array::<16>() {
        Ok(bytes) => from_random_bytes(bytes),
        Err(e) => {
            tracing::warn!(error = %e, "Entropy unavailable, using fallback user id");
            fallback_user_id()
        }
    }
}

fn from_random_bytes(bytes: [u8; 16]) -> UserId {
    let uuid = uuid::Builder::from_random_bytes(bytes).into_uuid();
    UserId::from_string(uuid.hyphenated().to_string())
}

fn fallback_user_id() -> UserId {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let seq = FALLBACK_SEQ.fetch_add(1, Ordering::Relaxed);
    UserId::from_string(format!("fallback-{nanos:x}-{seq:x}"))
}
