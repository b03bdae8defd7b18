use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

/// A three-page catalogue:
///
/// - page 1: bare, `../../../` and `../../` links to three good books;
/// - page 2: always answers 500;
/// - page 3: a book without a rating, a missing book (404), and a good book.
pub struct CatalogueStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

pub const PAGE_COUNT: u32 = 3;

#[allow(dead_code)]
pub const EXPECTED_TITLES: [Option<&str>; 6] = [
    Some("A Light in the Attic"),
    Some("Tipping the Velvet"),
    Some("Soumission"),
    None,
    None,
    Some("Sharp Objects"),
];

impl CatalogueStub {
    pub fn spawn() -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start catalogue stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}/");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let path = request.url().to_string();
                seen.lock().expect("lock request log").push(path.clone());

                let (status, body) = route(&path);
                let mut response = tiny_http::Response::from_string(body).with_status_code(status);
                if status == 200 {
                    let header = tiny_http::Header::from_bytes(
                        &b"Content-Type"[..],
                        &b"text/html; charset=utf-8"[..],
                    )
                    .expect("build header");
                    response = response.with_header(header);
                }
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("lock request log").clone()
    }
}

impl Drop for CatalogueStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn route(path: &str) -> (u16, String) {
    match path {
        "/catalogue/page-1.html" => (
            200,
            listing_page(&[
                "a-light-in-the-attic_1000/index.html",
                "../../../tipping-the-velvet_999/index.html",
                "../../soumission_998/index.html",
            ]),
        ),
        "/catalogue/page-2.html" => (500, "internal error".to_owned()),
        "/catalogue/page-3.html" => (
            200,
            listing_page(&[
                "no-rating_997/index.html",
                "gone_996/index.html",
                "sharp-objects_995/index.html",
            ]),
        ),
        "/catalogue/a-light-in-the-attic_1000/index.html" => {
            (200, item_page("A Light in the Attic", "£51.77", Some("Three")))
        }
        "/catalogue/tipping-the-velvet_999/index.html" => {
            (200, item_page("Tipping the Velvet", "£53.74", Some("One")))
        }
        // `../../` resolves against the site root, not the catalogue.
        "/soumission_998/index.html" => (200, item_page("Soumission", "£50.10", Some("One"))),
        "/catalogue/no-rating_997/index.html" => (200, item_page("No Rating", "£1.00", None)),
        "/catalogue/sharp-objects_995/index.html" => {
            (200, item_page("Sharp Objects", "£47.82", Some("Four")))
        }
        _ => (404, "not found".to_owned()),
    }
}

fn listing_page(links: &[&str]) -> String {
    let mut items = String::new();
    for href in links {
        items.push_str(&format!(
            r#"<li class="col-xs-6"><article class="product_pod"><h3><a href="{href}" title="book">book</a></h3><p class="price_color">£1.00</p></article></li>"#
        ));
    }
    format!(
        r#"<!DOCTYPE html>
<html><head><title>All products</title></head>
<body><section><ol class="row">{items}</ol></section></body></html>
"#
    )
}

fn item_page(title: &str, price: &str, rating: Option<&str>) -> String {
    let rating = match rating {
        Some(word) => format!(r#"<p class="star-rating {word}"><i class="icon-star"></i></p>"#),
        None => String::new(),
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en-us">
<head>
  <title>{title} | Books to Scrape - Sandbox</title>
  <meta name="description" content="
    About {title}.
  " />
</head>
<body>
  <div class="product_main">
    <h1>{title}</h1>
    <p class="price_color">{price}</p>
    <p class="instock availability">
      <i class="icon-ok"></i>
      In stock (20 available)
    </p>
    {rating}
  </div>
  <table class="table table-striped">
    <tr><th>UPC</th><td>upc-{title}</td></tr>
    <tr><th>Product Type</th><td>Books</td></tr>
    <tr><th>Price (excl. tax)</th><td>{price}</td></tr>
  </table>
</body>
</html>
"#
    )
}
