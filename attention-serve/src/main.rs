//! HTTP server for the attention visualization app.
//!
//! Serves the built WASM bundle with correct MIME types and forwards the
//! scoring endpoint to the model backend, so the browser only ever talks
//! same-origin.

use clap::Parser;
use mime_guess::MimeGuess;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tiny_http::{Header, Method, Response, Server, StatusCode};

/// Path the visualization fetches; POSTs here are forwarded to `--backend`.
const SCORING_ROUTE: &str = "/get_attention";

#[derive(Parser, Debug)]
#[command(name = "attention-serve")]
#[command(about = "Serves the attention visualization and proxies its scoring backend")]
struct Args {
    /// Directory to serve files from
    #[arg(default_value = ".")]
    directory: PathBuf,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Scoring backend URL the attention endpoint is forwarded to
    /// (e.g. http://localhost:5000/get_attention)
    #[arg(long)]
    backend: Option<String>,
}

fn main() {
    let args = Args::parse();

    let root_dir = args.directory.canonicalize().unwrap_or_else(|_| {
        eprintln!("Error: Directory '{}' not found", args.directory.display());
        std::process::exit(1);
    });

    let addr = format!("{}:{}", args.host, args.port);
    let server = Server::http(&addr).unwrap_or_else(|e| {
        eprintln!("Error starting server: {}", e);
        std::process::exit(1);
    });

    println!("Serving '{}' at http://{}", root_dir.display(), addr);
    match &args.backend {
        Some(backend) => println!("Forwarding {} to {}", SCORING_ROUTE, backend),
        None => println!("No --backend configured; {} will return 502", SCORING_ROUTE),
    }
    println!("Press Ctrl+C to stop");

    for mut request in server.incoming_requests() {
        let url_path = request.url().to_string();
        let url_path = url_path.split('?').next().unwrap_or(&url_path).to_string();

        if is_scoring_request(request.method(), &url_path) {
            let mut body = String::new();
            if request.as_reader().read_to_string(&mut body).is_err() {
                let _ = request.respond(bad_request());
                continue;
            }
            let response = match &args.backend {
                Some(backend) => forward_scoring(backend, &body),
                None => bad_gateway("no scoring backend configured"),
            };
            println!("{} {} -> {}", Method::Post, url_path, response.status_code().0);
            let _ = request.respond(response);
            continue;
        }

        // Decode URL-encoded characters
        let decoded_path = urlencoded_decode(&url_path);

        // Determine file path
        let relative_path = decoded_path.trim_start_matches('/');
        let file_path = if relative_path.is_empty() {
            root_dir.join("index.html")
        } else {
            root_dir.join(relative_path)
        };

        // Security: prevent directory traversal
        let canonical = match file_path.canonicalize() {
            Ok(p) => p,
            Err(_) => {
                let _ = request.respond(not_found());
                continue;
            }
        };

        if !canonical.starts_with(&root_dir) {
            let _ = request.respond(forbidden());
            continue;
        }

        // If directory, try index.html
        let final_path = if canonical.is_dir() {
            canonical.join("index.html")
        } else {
            canonical
        };

        // Serve the file
        match serve_file(&final_path) {
            Ok(response) => {
                println!("{} {} -> 200", request.method(), url_path);
                let _ = request.respond(response);
            }
            Err(_) => {
                println!("{} {} -> 404", request.method(), url_path);
                let _ = request.respond(not_found());
            }
        }
    }
}

/// Only the scoring POST is proxied; everything else is static serving.
fn is_scoring_request(method: &Method, path: &str) -> bool {
    *method == Method::Post && path == SCORING_ROUTE
}

/// Forward the analysis request body to the scoring backend and relay its
/// status and body. The app treats any non-success status as a display
/// string, so backend errors pass through unchanged.
fn forward_scoring(backend: &str, body: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    match ureq::post(backend)
        .set("Content-Type", "application/json")
        .send_string(body)
    {
        Ok(upstream) => {
            let status = upstream.status();
            let payload = upstream.into_string().unwrap_or_default();
            json_response(payload, status)
        }
        Err(ureq::Error::Status(status, upstream)) => {
            let payload = upstream.into_string().unwrap_or_default();
            json_response(payload, status)
        }
        Err(err) => bad_gateway(&format!("scoring backend unreachable: {}", err)),
    }
}

fn json_response(payload: String, status: u16) -> Response<std::io::Cursor<Vec<u8>>> {
    let content_type = Header::from_bytes("Content-Type", "application/json").unwrap();
    Response::from_string(payload)
        .with_status_code(StatusCode(status))
        .with_header(content_type)
}

fn serve_file(path: &Path) -> Result<Response<std::io::Cursor<Vec<u8>>>, std::io::Error> {
    let mut file = fs::File::open(path)?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)?;

    let mime = get_mime_type(path);
    let content_type = Header::from_bytes("Content-Type", mime).unwrap();

    // Add CORS headers for WASM
    let cors = Header::from_bytes("Access-Control-Allow-Origin", "*").unwrap();

    // Special header for SharedArrayBuffer support (needed by some WASM apps)
    let coop = Header::from_bytes("Cross-Origin-Opener-Policy", "same-origin").unwrap();
    let coep = Header::from_bytes("Cross-Origin-Embedder-Policy", "require-corp").unwrap();

    Ok(Response::from_data(contents)
        .with_header(content_type)
        .with_header(cors)
        .with_header(coop)
        .with_header(coep))
}

fn get_mime_type(path: &Path) -> &'static str {
    // Handle WASM specially since mime_guess might not have it
    if let Some(ext) = path.extension() {
        match ext.to_str() {
            Some("wasm") => return "application/wasm",
            Some("js") => return "application/javascript",
            Some("mjs") => return "application/javascript",
            _ => {}
        }
    }

    MimeGuess::from_path(path)
        .first_raw()
        .unwrap_or("application/octet-stream")
}

fn not_found() -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string("404 Not Found").with_status_code(StatusCode(404))
}

fn forbidden() -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string("403 Forbidden").with_status_code(StatusCode(403))
}

fn bad_request() -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string("400 Bad Request").with_status_code(StatusCode(400))
}

fn bad_gateway(message: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(format!("502 Bad Gateway: {}", message))
        .with_status_code(StatusCode(502))
}

fn urlencoded_decode(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '%' {
            let hex: String = chars.by_ref().take(2).collect();
            if let Ok(byte) = u8::from_str_radix(&hex, 16) {
                result.push(byte as char);
            } else {
                result.push('%');
                result.push_str(&hex);
            }
        } else if c == '+' {
            result.push(' ');
        } else {
            result.push(c);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_get_mime_type_wasm() {
        let path = Path::new("attention_viz_bg.wasm");
        assert_eq!(get_mime_type(path), "application/wasm");
    }

    #[test]
    fn test_get_mime_type_js() {
        let path = Path::new("attention_viz.js");
        assert_eq!(get_mime_type(path), "application/javascript");
    }

    #[test]
    fn test_get_mime_type_html() {
        let path = Path::new("index.html");
        assert_eq!(get_mime_type(path), "text/html");
    }

    #[test]
    fn test_scoring_route_matching() {
        assert!(is_scoring_request(&Method::Post, "/get_attention"));
        assert!(!is_scoring_request(&Method::Get, "/get_attention"));
        assert!(!is_scoring_request(&Method::Post, "/get_attention/extra"));
        assert!(!is_scoring_request(&Method::Post, "/index.html"));
    }

    #[test]
    fn test_missing_backend_returns_bad_gateway() {
        let response = bad_gateway("no scoring backend configured");
        assert_eq!(response.status_code().0, 502);
    }

    #[test]
    fn test_urlencoded_decode() {
        assert_eq!(urlencoded_decode("hello%20world"), "hello world");
        assert_eq!(urlencoded_decode("foo+bar"), "foo bar");
        assert_eq!(urlencoded_decode("test%2Fpath"), "test/path");
        assert_eq!(urlencoded_decode("normal"), "normal");
    }

    #[test]
    fn test_serve_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("index.html");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"<html>attention</html>").unwrap();

        let response = serve_file(&file_path).unwrap();
        assert_eq!(response.status_code().0, 200);
    }

    #[test]
    fn test_serve_file_not_found() {
        let result = serve_file(Path::new("/nonexistent/file.txt"));
        assert!(result.is_err());
    }
}
