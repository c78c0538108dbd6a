use std::env;

/// Collection queried when `NOTION_DATABASE_ID` is not set.
pub const DEFAULT_DATABASE_ID: &str = "314d6424bee1489a9f09a9b86a86ba1e";

pub const DEFAULT_NOTION_API_URL: &str = "https://api.notion.com/v1";

#[derive(Clone, Debug)]
pub struct Config {
    pub notion_api_key: String,
    pub notion_database_id: String,
    pub notion_api_url: String,
    pub frontend_url: String,
    pub clerk_jwks_url: String,
    pub clerk_issuer: Option<String>,
    pub server_host: String,
    pub server_port: u16,
    pub property_names: PropertyNames,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenvy::dotenv().ok();

        Ok(Config {
            notion_api_key: env::var("NOTION_API_KEY")?,
            notion_database_id: env::var("NOTION_DATABASE_ID")
                .unwrap_or_else(|_| DEFAULT_DATABASE_ID.to_string()),
            notion_api_url: env::var("NOTION_API_URL")
                .unwrap_or_else(|_| DEFAULT_NOTION_API_URL.to_string()),
            frontend_url: env::var("FRONTEND_URL")?,
            clerk_jwks_url: env::var("CLERK_JWKS_URL")?,
            clerk_issuer: env::var("CLERK_ISSUER").ok().filter(|s| !s.is_empty()),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8787".to_string())
                .parse()
                .unwrap_or(8787),
            property_names: PropertyNames::default(),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Names of the database properties read by the normalizer and query builder.
///
/// The inventory database is maintained in Spanish, so the defaults are the
/// Spanish column names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyNames {
    pub name: String,
    pub creator: String,
    pub box_id: String,
    pub utem_code: String,
    pub internal_code: String,
    pub concept: String,
    pub location_or_borrowed_by: String,
    pub property: String,
    pub designated_location: String,
    pub circumstance: String,
    pub status: String,
}

impl Default for PropertyNames {
    fn default() -> Self {
        Self {
            name: "Nombre".to_string(),
            creator: "Creado por".to_string(),
            box_id: "ID caja".to_string(),
            utem_code: "Código UTEM".to_string(),
            internal_code: "Código Interno".to_string(),
            concept: "Concepto".to_string(),
            location_or_borrowed_by: "Ubicación/Prestado a".to_string(),
            property: "Propiedad".to_string(),
            designated_location: "Area Ubicacion".to_string(),
            circumstance: "Circunstancia".to_string(),
            status: "Estado".to_string(),
        }
    }
}
