use std::convert::TryInto;
use std::path::PathBuf;
use std::{env, fs};

const PASSWORD_SALT: &str = "password.salt";
const JWT_SECRET_FILE: &str = "jwt.secret";

pub type Salt = [u8; 16];

/// Process-wide secret material: the bcrypt salt for stored password hashes
/// and the HS256 secret used to sign user tokens.
#[derive(Debug, Clone)]
pub struct Security {
    pub salt: Salt,
    pub jwt_secret: Vec<u8>,
}

#[inline]
fn security_dir() -> PathBuf {
    PathBuf::from(env::var("SECURITY_DIR").unwrap_or("./security".to_string()))
}

impl Security {
    pub fn load() -> Security {
        let dir = security_dir();

        if cfg!(feature = "generate-security") {
            fs::create_dir_all(dir.clone())
                .expect("unable to create directory for storing security information");
        }

        tracing::info!("Loading password salt...");
        let mut salt: Option<Salt> = fs::read(dir.join(PASSWORD_SALT))
            .map(|s| s.try_into().ok())
            .ok()
            .flatten();

        match salt {
            None => {
                tracing::info!("Salt not found in '{}'.", dir.join(PASSWORD_SALT).display());
                if cfg!(feature = "generate-security") {
                    tracing::info!("Generating a new password salt.");
                    salt = Some(rand::random());

                    fs::write(dir.join(PASSWORD_SALT), salt.unwrap())
                        .expect("unable to write salt");
                }
            }
            Some(_) => tracing::info!("Salt found and loaded."),
        }

        tracing::info!("Loading JWT signing secret...");
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => {
                tracing::info!("Using JWT secret from environment.");
                secret.into_bytes()
            }
            _ => match fs::read(dir.join(JWT_SECRET_FILE)) {
                Ok(secret) if !secret.is_empty() => {
                    tracing::info!("Loaded JWT secret.");
                    secret
                }
                #[cfg(feature = "generate-security")]
                _ => {
                    use rand::RngCore;

                    tracing::info!("JWT secret missing or empty. Generating a new one.");
                    let mut secret = vec![0u8; 64];
                    rand::thread_rng().fill_bytes(&mut secret);

                    fs::write(dir.join(JWT_SECRET_FILE), secret.as_slice())
                        .expect("unable to write JWT secret");

                    secret
                }
                #[cfg(not(feature = "generate-security"))]
                _ => {
                    panic!("Unable to load JWT signing secret.");
                }
            },
        };

        Security {
            salt: salt.expect("password salt missing and generation disabled"),
            jwt_secret,
        }
    }
}
