// Local network interface enumeration

use std::io;

/// One address bound to a named interface, as the OS reported it.
///
/// `addr` may still carry a `/prefix` or `%zone` suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddr {
    pub name: String,
    pub addr: String,
}

impl InterfaceAddr {
    pub fn new(name: impl Into<String>, addr: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            addr: addr.into(),
        }
    }
}

/// Enumerate IPv4 and IPv6 addresses of every local interface
#[cfg(unix)]
pub fn system_interfaces() -> io::Result<Vec<InterfaceAddr>> {
    use nix::ifaddrs::getifaddrs;
    use std::net::{SocketAddrV4, SocketAddrV6};

    let addrs = getifaddrs().map_err(io::Error::from)?;

    Ok(addrs
        .filter_map(|ifaddr| {
            let storage = ifaddr.address?;
            let ip = if let Some(sin) = storage.as_sockaddr_in() {
                SocketAddrV4::from(*sin).ip().to_string()
            } else if let Some(sin6) = storage.as_sockaddr_in6() {
                SocketAddrV6::from(*sin6).ip().to_string()
            } else {
                return None;
            };
            Some(InterfaceAddr::new(ifaddr.interface_name, ip))
        })
        .collect())
}

/// Enumerate IPv4 and IPv6 addresses of every local interface
#[cfg(not(unix))]
pub fn system_interfaces() -> io::Result<Vec<InterfaceAddr>> {
    let out = super::Runner::default().run(
        "powershell",
        &[
            "-c",
            "Get-NetIPAddress | ForEach-Object { $_.InterfaceAlias + \"`t\" + $_.IPAddress }",
        ],
    );

    if out.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            "Get-NetIPAddress produced no output",
        ));
    }

    Ok(parse_tab_separated(&out))
}

/// Parse `name<TAB>address` lines; the name may contain spaces
pub fn parse_tab_separated(text: &str) -> Vec<InterfaceAddr> {
    text.lines()
        .filter_map(|line| {
            let (name, addr) = line.rsplit_once('\t')?;
            let (name, addr) = (name.trim(), addr.trim());
            if name.is_empty() || addr.is_empty() {
                None
            } else {
                Some(InterfaceAddr::new(name, addr))
            }
        })
        .collect()
}
