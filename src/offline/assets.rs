//! Preload asset list
//!
//! Static configuration data, not logic: the fixed set of URLs populated
//! into the offline store at activation. Local paths resolve against the
//! page origin; the two absolute entries are the CSS delivery and web-font
//! delivery origins.

pub const PRELOAD_ASSETS: &[&str] = &[
    "/",
    "/index.html",
    "/favicon.ico",
    "https://cdn.tailwindcss.com",
    "https://fonts.googleapis.com/css2?family=Inter:wght@400;600;700&display=swap",
    "/logo.svg",
    "/facebook.svg",
    "/instagram.svg",
    "/twitter.svg",
    "/pinterest.svg",
    "/youtube.svg",
    "/email.svg",
    "/share.svg",
    "/whatsapp.svg",
    "/fb.svg",
    "/ins.svg",
    "/telegram.svg",
];
