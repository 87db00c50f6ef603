use argon2::{
    password_hash::SaltString, Algorithm, Argon2, Params, PasswordHash, PasswordHasher,
    PasswordVerifier, Version,
};
use rand::rngs::OsRng;

use crate::errors::{Error, Result};

pub fn password_hasher() -> Argon2<'static> {
    // Argon2id, 768 KiB, single pass
    const MEMORY_COST_KIB: u32 = 768;
    const ITERATIONS: u32 = 1;
    const PARALLELISM: u32 = 1;
    match Params::new(MEMORY_COST_KIB, ITERATIONS, PARALLELISM, Some(32)) {
        Ok(params) => Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        Err(_) => Argon2::default(),
    }
}

pub fn hash_password(argon2: &Argon2<'_>, password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| Error::internal(format!("Failed to hash password: {}", err)))?;
    Ok(hash.to_string())
}

pub fn verify_password(argon2: &Argon2<'_>, stored: &str, candidate: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|err| Error::internal(format!("Invalid password hash: {}", err)))?;
    Ok(argon2.verify_password(candidate.as_bytes(), &parsed).is_ok())
}
