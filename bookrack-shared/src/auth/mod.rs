/// Authentication primitives for Bookrack
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Constant-time Comparison**: verification uses the argon2 primitive's
///   constant-time check; no hash material is compared byte-wise in
///   application code
///
/// # Example
///
/// ```
/// use bookrack_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
/// # Ok(())
/// # }
/// ```

pub mod password;
