use std::net::{Ipv4Addr, TcpListener};

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Binds every address on one shared port, so a single scan port reaches
/// all of them. Retries with a fresh port when one of the addresses is taken.
pub fn bind_shared_port(addrs: &[Ipv4Addr]) -> Option<(u16, Vec<TcpListener>)> {
    let (first, rest) = addrs.split_first()?;

    for _ in 0..16 {
        let Ok(head) = TcpListener::bind((*first, 0)) else {
            return None;
        };
        let Ok(port) = head.local_addr().map(|a| a.port()) else {
            continue;
        };

        let mut listeners = vec![head];
        for addr in rest {
            match TcpListener::bind((*addr, port)) {
                Ok(listener) => listeners.push(listener),
                Err(_) => break,
            }
        }
        if listeners.len() == addrs.len() {
            return Some((port, listeners));
        }
    }
    None
}

/// Serves the device API on an already bound listener.
///
/// `/` answers with `root_status`; `/hostname` answers only when `hostname`
/// is given, every other path falls through to wiremock's 404.
pub async fn device(listener: TcpListener, root_status: u16, hostname: Option<&str>) -> MockServer {
    listener
        .set_nonblocking(true)
        .expect("listener must support non-blocking mode");
    let server = MockServer::builder().listener(listener).start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(root_status))
        .mount(&server)
        .await;

    if let Some(name) = hostname {
        Mock::given(method("GET"))
            .and(path("/hostname"))
            .respond_with(ResponseTemplate::new(200).set_body_string(name))
            .mount(&server)
            .await;
    }

    server
}
