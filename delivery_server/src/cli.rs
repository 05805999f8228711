use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        // We don't expect any CLI args, so always print the help
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Be explicit about which envars to print, so as to avoid accidentally exposing secrets
    const DISPLAY_ENVS: [&str; 19] = [
        "RUST_LOG",
        "DLV_HOST",
        "DLV_PORT",
        "DLV_DATABASE_URL",
        "DLV_USERS_TABLE",
        "DLV_DELIVERY_ADDRESS_TABLE",
        "DLV_PRODUCTS_TABLE",
        "DLV_CATEGORIES_TABLE",
        "DLV_ADS_TABLE",
        "DLV_ORDERS_TABLE",
        "DLV_ORDER_ITEMS_TABLE",
        "DLV_JWT_ISSUER",
        "DLV_OTP_MODE",
        "DLV_ORDER_QUEUE",
        "DLV_QUEUE_BUFFER_SIZE",
        "DLV_QUEUE_BATCH_SIZE",
        "DLV_QUEUE_MAX_RECEIVE_COUNT",
        "DLV_NOTIFICATION_TOPIC",
        "DLV_NOTIFICATION_WEBHOOK_URL",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
