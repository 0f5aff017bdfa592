use crate::domain::logging::{LogComponent, get_logger};
use crate::domain::session::WalletConnection;

/// In-memory wallet for the demo and for tests.
///
/// By default a connection request stays pending until
/// [`DemoWallet::complete_connection`]; `auto_approve` connects at once.
#[derive(Debug, Clone, Default)]
pub struct DemoWallet {
    address: Option<String>,
    pending: bool,
    auto_approve: bool,
    requests: u32,
}

impl DemoWallet {
    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn connected(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            ..Self::default()
        }
    }

    /// Connect with a random address as soon as a connection is requested
    pub fn auto_approving() -> Self {
        Self {
            auto_approve: true,
            ..Self::default()
        }
    }

    pub fn complete_connection(&mut self, address: impl Into<String>) {
        self.address = Some(address.into());
        self.pending = false;
    }

    pub fn disconnect(&mut self) {
        self.address = None;
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// How many times the connect flow was started
    pub fn connection_requests(&self) -> u32 {
        self.requests
    }
}

/// `0x` followed by 40 hex chars
pub fn random_address() -> String {
    format!("0x{}", hex::encode(rand::random::<[u8; 20]>()))
}

impl WalletConnection for DemoWallet {
    fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    fn request_connection(&mut self) {
        self.requests += 1;
        if self.auto_approve {
            let address = random_address();
            get_logger().info(
                LogComponent::Infrastructure("Wallet"),
                &format!("demo wallet connected as {}", address),
            );
            self.complete_connection(address);
        } else {
            self.pending = true;
        }
    }
}
