// Database row types shared across services.

pub mod resume;
