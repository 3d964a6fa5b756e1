use rand::distributions::Alphanumeric;
use rand::Rng;

/// Random alphanumeric secret, used for generated webhook credentials
pub fn create_random_secret(secret_len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(secret_len)
        .map(char::from)
        .collect()
}
