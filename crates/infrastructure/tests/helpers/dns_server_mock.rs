use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

const TYPE_A: u16 = 1;
const TYPE_PTR: u16 = 12;

#[derive(Debug, Clone)]
pub enum MockAnswer {
    A(Vec<Ipv4Addr>),
    Ptr(Vec<String>),
    NxDomain,
    ServFail,
}

#[derive(Debug, Clone, Default)]
struct Zone {
    answers: HashMap<String, MockAnswer>,
    truncate_udp: bool,
    decoy_id: bool,
}

/// Authoritative-looking DNS server on 127.0.0.1, answering over UDP and TCP
/// on the same port from a fixed table of names.
pub struct MockDnsServer {
    zone: Zone,
}

pub struct RunningServer {
    addr: SocketAddr,
    udp_queries: Arc<AtomicUsize>,
    tcp_queries: Arc<AtomicUsize>,
    tcp_connections: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub fn new() -> Self {
        Self {
            zone: Zone::default(),
        }
    }

    pub fn with_a(mut self, name: &str, ips: &[Ipv4Addr]) -> Self {
        self.zone
            .answers
            .insert(normalize(name), MockAnswer::A(ips.to_vec()));
        self
    }

    pub fn with_ptr(mut self, ip: Ipv4Addr, names: &[&str]) -> Self {
        let o = ip.octets();
        let reverse = format!("{}.{}.{}.{}.in-addr.arpa", o[3], o[2], o[1], o[0]);
        self.zone.answers.insert(
            reverse,
            MockAnswer::Ptr(names.iter().map(|n| n.to_string()).collect()),
        );
        self
    }

    pub fn with_answer(mut self, name: &str, answer: MockAnswer) -> Self {
        self.zone.answers.insert(normalize(name), answer);
        self
    }

    /// UDP answers carry the TC bit and no records; TCP answers are complete.
    pub fn truncate_udp(mut self) -> Self {
        self.zone.truncate_udp = true;
        self
    }

    /// Every UDP answer is preceded by a datagram carrying the wrong ID.
    pub fn with_decoy_id(mut self) -> Self {
        self.zone.decoy_id = true;
        self
    }

    pub async fn start(self) -> Result<RunningServer, std::io::Error> {
        let socket = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = socket.local_addr()?;
        let listener = TcpListener::bind(addr).await?;

        let udp_queries = Arc::new(AtomicUsize::new(0));
        let tcp_queries = Arc::new(AtomicUsize::new(0));
        let tcp_connections = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let zone = Arc::new(self.zone);
        let udp_count = udp_queries.clone();
        let tcp_count = tcp_queries.clone();
        let conn_count = tcp_connections.clone();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            udp_count.fetch_add(1, Ordering::SeqCst);
                            let query = buf[..len].to_vec();
                            if zone.decoy_id {
                                let mut decoy = build_response(&zone, &query, false);
                                decoy[0] ^= 0xff;
                                let _ = socket.send_to(&decoy, peer).await;
                            }
                            let response = build_response(&zone, &query, zone.truncate_udp);
                            let _ = socket.send_to(&response, peer).await;
                        }
                    }
                    accepted = listener.accept() => {
                        if let Ok((mut stream, _)) = accepted {
                            conn_count.fetch_add(1, Ordering::SeqCst);
                            let zone = zone.clone();
                            let tcp_count = tcp_count.clone();
                            tokio::spawn(async move {
                                loop {
                                    let mut len_buf = [0u8; 2];
                                    if stream.read_exact(&mut len_buf).await.is_err() {
                                        break;
                                    }
                                    let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
                                    if stream.read_exact(&mut query).await.is_err() {
                                        break;
                                    }
                                    tcp_count.fetch_add(1, Ordering::SeqCst);
                                    let response = build_response(&zone, &query, false);
                                    let mut framed = (response.len() as u16).to_be_bytes().to_vec();
                                    framed.extend_from_slice(&response);
                                    if stream.write_all(&framed).await.is_err() {
                                        break;
                                    }
                                }
                            });
                        }
                    }
                }
            }
        });

        Ok(RunningServer {
            addr,
            udp_queries,
            tcp_queries,
            tcp_connections,
            shutdown_tx: Some(shutdown_tx),
        })
    }
}

impl RunningServer {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_queries(&self) -> usize {
        self.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.tcp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_connections(&self) -> usize {
        self.tcp_connections.load(Ordering::SeqCst)
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}

/// Returns the question name and the offset just past QTYPE/QCLASS.
fn parse_question(query: &[u8]) -> Option<(String, u16, usize)> {
    let mut pos = 12;
    let mut labels = Vec::new();
    loop {
        let len = *query.get(pos)? as usize;
        pos += 1;
        if len == 0 {
            break;
        }
        let label = query.get(pos..pos + len)?;
        labels.push(String::from_utf8_lossy(label).to_ascii_lowercase());
        pos += len;
    }
    let qtype = u16::from_be_bytes([*query.get(pos)?, *query.get(pos + 1)?]);
    Some((labels.join("."), qtype, pos + 4))
}

fn encode_name(name: &str) -> Vec<u8> {
    let mut out = Vec::new();
    for label in name.trim_end_matches('.').split('.').filter(|l| !l.is_empty()) {
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.push(0);
    out
}

fn build_response(zone: &Zone, query: &[u8], truncated: bool) -> Vec<u8> {
    let Some((qname, qtype, question_end)) = parse_question(query) else {
        return vec![];
    };

    let mut rcode = 0u8;
    let mut answers: Vec<(u16, Vec<u8>)> = Vec::new();

    if !truncated {
        match zone.answers.get(&qname) {
            Some(MockAnswer::A(ips)) if qtype == TYPE_A => {
                answers.extend(ips.iter().map(|ip| (TYPE_A, ip.octets().to_vec())));
            }
            Some(MockAnswer::Ptr(names)) if qtype == TYPE_PTR => {
                answers.extend(names.iter().map(|n| (TYPE_PTR, encode_name(n))));
            }
            Some(MockAnswer::NxDomain) | None => rcode = 3,
            Some(MockAnswer::ServFail) => rcode = 2,
            Some(_) => {}
        }
    }

    let mut response = Vec::with_capacity(512);
    response.extend_from_slice(&query[0..2]);
    response.push(if truncated { 0x83 } else { 0x81 });
    response.push(0x80 | rcode);
    response.extend_from_slice(&[0x00, 0x01]);
    response.extend_from_slice(&(answers.len() as u16).to_be_bytes());
    response.extend_from_slice(&[0x00, 0x00]);
    response.extend_from_slice(&[0x00, 0x00]);
    response.extend_from_slice(&query[12..question_end]);

    for (rtype, rdata) in answers {
        response.extend_from_slice(&[0xc0, 0x0c]);
        response.extend_from_slice(&rtype.to_be_bytes());
        response.extend_from_slice(&[0x00, 0x01]);
        response.extend_from_slice(&[0x00, 0x00, 0x00, 0x3c]);
        response.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        response.extend_from_slice(&rdata);
    }

    response
}
