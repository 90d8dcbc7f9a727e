//! HTTP telemetry sink against a local listener.

mod fixtures;

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread;

use drone_route_planner::http_sink::{HttpSinkConfig, HttpTelemetrySink};
use drone_route_planner::planner::plan;
use drone_route_planner::telemetry::publish_route;

use fixtures::*;

/// Accept `count` requests, answer each with `status`, return the bodies.
fn serve(count: usize, status: &'static str) -> (String, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
    let url = format!("http://{}/telemetry", listener.local_addr().expect("local addr"));

    let handle = thread::spawn(move || {
        let mut bodies = Vec::new();
        for stream in listener.incoming().take(count) {
            let mut stream = stream.expect("accept");
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).expect("read header");
                let line = line.trim_end();
                if line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().expect("content length");
                    }
                }
            }

            let mut body = vec![0u8; content_length];
            reader.read_exact(&mut body).expect("read body");
            bodies.push(String::from_utf8(body).expect("utf8 body"));

            let response = format!("HTTP/1.1 {status}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
            stream.write_all(response.as_bytes()).expect("write response");
        }
        bodies
    });

    (url, handle)
}

#[test]
fn posts_every_step_then_summary() {
    let mut request = county_request(0.25);
    request.destinations.truncate(2);
    let outcome = plan(&request);
    let expected = outcome.steps.len() + 1;

    let (url, server) = serve(expected, "200 OK");
    let sink = HttpTelemetrySink::new(HttpSinkConfig {
        url,
        timeout_secs: 5,
    })
    .expect("build sink");

    let report = publish_route(&sink, &outcome).expect("publish");
    assert_eq!(report.steps_sent, outcome.steps.len());
    assert_eq!(report.steps_failed, 0);

    let bodies = server.join().expect("server thread");
    assert_eq!(bodies.len(), expected);

    let first: serde_json::Value = serde_json::from_str(&bodies[0]).expect("step json");
    assert_eq!(first["previous"], "GLS Hungary");
    assert_eq!(first["drone_id"], "1");

    let summary: serde_json::Value = serde_json::from_str(&bodies[expected - 1]).expect("summary json");
    let route: Vec<String> = serde_json::from_value(summary["route"].clone()).expect("route list");
    assert_eq!(route, outcome.summary().route);
}

#[test]
fn server_error_on_summary_is_returned() {
    let mut request = county_request(0.0);
    request.destinations.truncate(1);
    let outcome = plan(&request);
    let expected = outcome.steps.len() + 1;

    let (url, server) = serve(expected, "500 Internal Server Error");
    let sink = HttpTelemetrySink::new(HttpSinkConfig {
        url,
        timeout_secs: 5,
    })
    .expect("build sink");

    let err = publish_route(&sink, &outcome).unwrap_err();
    assert!(err.to_string().contains("telemetry request failed"));

    let bodies = server.join().expect("server thread");
    assert_eq!(bodies.len(), expected);
}
