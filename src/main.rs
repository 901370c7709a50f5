use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use dirview::config::{Settings, TlsFiles};
use dirview::handlers::{configure, static_handler};
use log::info;
use rustls::ServerConfig;
use rustls_pemfile::{certs, pkcs8_private_keys};
use std::fs::File;
use std::io::{self, BufReader};

fn load_tls(files: &TlsFiles) -> io::Result<ServerConfig> {
    let cert_file = &mut BufReader::new(File::open(&files.cert_path)?);
    let key_file = &mut BufReader::new(File::open(&files.key_path)?);
    let cert_chain = certs(cert_file).collect::<Result<Vec<_>, _>>()?;
    let mut keys = pkcs8_private_keys(key_file).collect::<Result<Vec<_>, _>>()?;

    if keys.is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "No private keys found in key file"));
    }

    ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(cert_chain, keys.remove(0).into())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Override the log level with RUST_LOG, e.g. `RUST_LOG=debug`.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::from_env()?;
    let addr = settings.bind_addr();
    info!("Serving directory tree rooted at {}", settings.base_dir.display());

    let data = web::Data::new(settings.clone());
    let mut http_server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(data.clone())
            .configure(configure)
            .default_service(web::to(static_handler))
    });

    match &settings.tls {
        Some(files) => {
            let config = load_tls(files)?;
            info!("Successfully configured TLS. Binding to https://{}", addr);
            http_server = http_server.bind_rustls_0_23(&addr, config)?;
        }
        None => {
            info!("No TLS configured. Server running at http://{}", addr);
            http_server = http_server.bind(&addr)?;
        }
    }

    http_server.run().await
}
