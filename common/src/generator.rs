use rand::Rng;

pub const USERNAME_PREFIX: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

fn random_hex<const N: usize>() -> String {
    let mut bytes = [0u8; N];
    rand::rng().fill(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// 8 uppercase hex characters. Uniqueness is enforced by the store, not here.
pub fn generate_code() -> String {
    random_hex::<4>().to_uppercase()
}

pub fn generate_credentials() -> Credentials {
    Credentials {
        username: format!("{}{}", USERNAME_PREFIX, random_hex::<4>()),
        password: random_hex::<3>(),
    }
}
