//! Interface address cache
//!
//! Enumerating interfaces is shared by the IPv4 and IPv6 collection tasks,
//! which run concurrently. The cache makes sure the enumeration happens at
//! most once per snapshot: the first caller populates it under the lock and
//! everyone after that reads the stored map.

use crate::stats::Source;
use crate::text::parse_host;
use regex::Regex;
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Interfaces hidden by default: container and virtual bridges
pub const DEFAULT_EXCLUDE: &str = r"^(br-|docker|veth|virbr|lxcbr|cni|flannel)";

/// Interface name to its reportable addresses
pub type AddressMap = BTreeMap<String, Vec<IpAddr>>;

/// Lazily populated, lock-guarded address map
#[derive(Debug, Default)]
pub struct IpCache {
    populated: AtomicBool,
    entries: Mutex<Arc<AddressMap>>,
}

impl IpCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_populated(&self) -> bool {
        self.populated.load(Ordering::Acquire)
    }

    /// Addresses by interface, enumerating through `source` on first use.
    ///
    /// Enumeration failure leaves the cache populated and empty.
    pub fn addresses_by_interface(
        &self,
        source: &dyn Source,
        exclude: Option<&Regex>,
    ) -> Arc<AddressMap> {
        if self.is_populated() {
            return Arc::clone(&self.lock());
        }

        let mut entries = self.lock();
        // Another task may have finished populating while we waited
        if self.is_populated() {
            return Arc::clone(&entries);
        }

        let map = match source.interfaces() {
            Ok(addrs) => {
                let pairs = addrs.iter().map(|a| (a.name.as_str(), a.addr.as_str()));
                build_map(pairs, exclude)
            }
            Err(e) => {
                tracing::debug!(error = %e, "interface enumeration failed");
                AddressMap::new()
            }
        };
        tracing::debug!(interfaces = map.len(), "ip cache populated");

        *entries = Arc::new(map);
        self.populated.store(true, Ordering::Release);
        Arc::clone(&entries)
    }

    /// Sorted `"<interface> <address>"` IPv4 entries
    pub fn ipv4(&self, source: &dyn Source, exclude: Option<&Regex>) -> Vec<String> {
        self.filtered(source, exclude, |ip| ip.is_ipv4())
    }

    /// Sorted `"<interface> <address>"` IPv6 entries, with any link-local stragglers dropped
    pub fn ipv6(&self, source: &dyn Source, exclude: Option<&Regex>) -> Vec<String> {
        self.filtered(source, exclude, |ip| ip.is_ipv6() && !is_fe80_range(ip))
    }

    /// Forget everything; the next read enumerates again
    pub fn clear(&mut self) {
        *self.entries.get_mut().unwrap_or_else(|e| e.into_inner()) = Arc::new(AddressMap::new());
        *self.populated.get_mut() = false;
    }

    fn filtered(
        &self,
        source: &dyn Source,
        exclude: Option<&Regex>,
        keep: impl Fn(&IpAddr) -> bool,
    ) -> Vec<String> {
        let map = self.addresses_by_interface(source, exclude);
        let mut out: Vec<String> = map
            .iter()
            .flat_map(|(name, ips)| ips.iter().map(move |ip| (name, ip)))
            .filter(|(_, ip)| keep(*ip))
            .map(|(name, ip)| format!("{} {}", name, ip))
            .collect();
        out.sort();
        out
    }

    fn lock(&self) -> MutexGuard<'_, Arc<AddressMap>> {
        // A panicked writer cannot leave the map half-built: it is swapped in whole
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Group usable addresses by interface name
pub fn build_map<'a>(
    addrs: impl IntoIterator<Item = (&'a str, &'a str)>,
    exclude: Option<&Regex>,
) -> AddressMap {
    let mut map = AddressMap::new();

    for (name, addr) in addrs {
        let ip = match parse_host(addr) {
            Some(ip) => ip,
            None => continue,
        };
        if !is_reportable(&ip) {
            continue;
        }
        if exclude.is_some_and(|re| re.is_match(name)) {
            continue;
        }
        map.entry(name.to_string()).or_default().push(ip);
    }

    map
}

/// Not loopback, not link-local unicast, not link-local multicast
fn is_reportable(ip: &IpAddr) -> bool {
    if ip.is_loopback() {
        return false;
    }
    match ip {
        IpAddr::V4(v4) => {
            let o = v4.octets();
            !(v4.is_link_local() || (o[0] == 224 && o[1] == 0 && o[2] == 0))
        }
        IpAddr::V6(v6) => {
            let seg = v6.segments();
            let link_local_unicast = (seg[0] & 0xffc0) == 0xfe80;
            let link_local_multicast = (seg[0] & 0xff0f) == 0xff02;
            !(link_local_unicast || link_local_multicast)
        }
    }
}

/// `fe8x` through `febx`, the textual link-local check
fn is_fe80_range(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V6(v6) => (v6.segments()[0] & 0xffc0) == 0xfe80,
        IpAddr::V4(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{InterfaceAddr, Mount};
    use std::io;
    use std::sync::atomic::AtomicUsize;

    struct CountingSource {
        calls: AtomicUsize,
        addrs: Vec<InterfaceAddr>,
    }

    impl CountingSource {
        fn new(addrs: &[(&str, &str)]) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                addrs: addrs.iter().map(|(n, a)| InterfaceAddr::new(*n, *a)).collect(),
            }
        }
    }

    impl Source for CountingSource {
        fn hostname(&self) -> String {
            String::new()
        }

        fn operating_system(&self) -> String {
            String::new()
        }

        fn kernel(&self) -> String {
            String::new()
        }

        fn uptime(&self) -> String {
            String::new()
        }

        fn shell(&self) -> String {
            String::new()
        }

        fn tty(&self) -> String {
            String::new()
        }

        fn cpu(&self) -> String {
            String::new()
        }

        fn ram(&self) -> String {
            String::new()
        }

        fn fs_usage(&self, _mount: Mount) -> String {
            String::new()
        }

        fn interfaces(&self) -> io::Result<Vec<InterfaceAddr>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Widen the race window for the concurrency test
            std::thread::sleep(std::time::Duration::from_millis(20));
            Ok(self.addrs.clone())
        }
    }

    const ADDRS: &[(&str, &str)] = &[
        ("lo", "127.0.0.1/8"),
        ("lo", "::1/128"),
        ("wlan0", "192.168.1.20/24"),
        ("wlan0", "fe80::1c2d:3e4f/64"),
        ("wlan0", "2001:db8::20/64"),
        ("eth0", "10.0.0.5/8"),
        ("docker0", "172.17.0.1/16"),
        ("eth0", "169.254.10.1/16"),
        ("eth0", "garbage"),
    ];

    #[test]
    fn test_filters_and_sorts() {
        let source = CountingSource::new(ADDRS);
        let cache = IpCache::new();
        let exclude = Regex::new(DEFAULT_EXCLUDE).unwrap();

        assert_eq!(
            cache.ipv4(&source, Some(&exclude)),
            vec!["eth0 10.0.0.5", "wlan0 192.168.1.20"]
        );
        assert_eq!(cache.ipv6(&source, Some(&exclude)), vec!["wlan0 2001:db8::20"]);
    }

    #[test]
    fn test_interface_names_with_spaces() {
        let source = CountingSource::new(&[
            ("Ethernet 2", "192.168.0.12"),
            ("vEthernet (WSL)", "172.28.16.1/20"),
            ("Local Area Connection* 1", "2001:db8::7"),
            ("eth0", "10.0.0.2/24"),
        ]);
        let cache = IpCache::new();

        assert_eq!(
            cache.ipv4(&source, None),
            vec![
                "Ethernet 2 192.168.0.12",
                "eth0 10.0.0.2",
                "vEthernet (WSL) 172.28.16.1",
            ]
        );
        assert_eq!(
            cache.ipv6(&source, None),
            vec!["Local Area Connection* 1 2001:db8::7"]
        );
    }

    #[test]
    fn test_exclusion_is_optional() {
        let source = CountingSource::new(ADDRS);
        let cache = IpCache::new();
        assert!(cache.ipv4(&source, None).contains(&"docker0 172.17.0.1".to_string()));
    }

    #[test]
    fn test_enumerates_once() {
        let source = CountingSource::new(ADDRS);
        let cache = IpCache::new();
        cache.ipv4(&source, None);
        cache.ipv6(&source, None);
        cache.addresses_by_interface(&source, None);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_callers_enumerate_once() {
        let source = CountingSource::new(ADDRS);
        let cache = IpCache::new();

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| cache.ipv4(&source, None));
                s.spawn(|| cache.ipv6(&source, None));
            }
        });

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_clear_allows_new_enumeration() {
        let source = CountingSource::new(ADDRS);
        let mut cache = IpCache::new();
        cache.ipv4(&source, None);
        cache.clear();
        assert!(!cache.is_populated());
        cache.ipv4(&source, None);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_enumeration_failure_is_empty() {
        struct Failing;
        impl Source for Failing {
            fn hostname(&self) -> String {
                String::new()
            }

            fn operating_system(&self) -> String {
                String::new()
            }

            fn kernel(&self) -> String {
                String::new()
            }

            fn uptime(&self) -> String {
                String::new()
            }

            fn shell(&self) -> String {
                String::new()
            }

            fn tty(&self) -> String {
                String::new()
            }

            fn cpu(&self) -> String {
                String::new()
            }

            fn ram(&self) -> String {
                String::new()
            }

            fn fs_usage(&self, _mount: Mount) -> String {
                String::new()
            }

            fn interfaces(&self) -> io::Result<Vec<InterfaceAddr>> {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "no"))
            }
        }

        let cache = IpCache::new();
        assert!(cache.ipv4(&Failing, None).is_empty());
        assert!(cache.ipv6(&Failing, None).is_empty());
        assert!(cache.is_populated());
    }

    #[test]
    fn test_link_local_multicast_dropped() {
        let map = build_map([("eth0", "ff02::1"), ("eth0", "224.0.0.251")], None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_fe80_range() {
        assert!(is_fe80_range(&"febf::1".parse().unwrap()));
        assert!(!is_fe80_range(&"fec0::1".parse().unwrap()));
        assert!(!is_fe80_range(&"10.0.0.1".parse().unwrap()));
    }
}
