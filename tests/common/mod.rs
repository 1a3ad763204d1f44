//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{keccak256, Address, Bytes, TxHash};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

use send_eth::blockchain::{
    ChainClient, ChainError, ChainResult, PrivateKey, SignedTransaction, UnsignedTransaction,
};
use send_eth::transfer::TransferRequest;

pub const GWEI: u128 = 1_000_000_000;

/// Anvil's first development account.
pub const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const DEV_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
pub const OTHER_KEY: &str = "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
pub const OTHER_ADDRESS: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";
pub const THIRD_ADDRESS: &str = "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC";

pub fn transfer(source: &str, target: &str, amount: &str, key: &str) -> TransferRequest {
    TransferRequest::new(source, target, amount, PrivateKey::new(key))
}

/// One call observed by [`MockChainClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Nonce(Address),
    EstimateGasPrice,
    Sign(UnsignedTransaction),
    Submit(TxHash),
}

/// Which step of the mock should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Failure {
    #[default]
    None,
    Nonce,
    GasPrice,
    Sign,
    Submit,
}

/// In-memory node double that records every call.
///
/// Nonces behave like a node's pending count: the configured starting value
/// plus the number of accepted submissions from that address. Signing is
/// fake but attributes each payload to the key's real address.
pub struct MockChainClient {
    start_nonce: u64,
    gas_price: u128,
    failure: Failure,
    nonce_delay: Duration,
    pending: Mutex<HashMap<Address, u64>>,
    signers: Mutex<HashMap<TxHash, Address>>,
    calls: Mutex<Vec<Call>>,
}

impl MockChainClient {
    pub fn new(start_nonce: u64) -> Self {
        Self {
            start_nonce,
            gas_price: 30 * GWEI,
            failure: Failure::None,
            nonce_delay: Duration::ZERO,
            pending: Mutex::new(HashMap::new()),
            signers: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = gas_price;
        self
    }

    pub fn failing(mut self, failure: Failure) -> Self {
        self.failure = failure;
        self
    }

    /// Hold every nonce query open for `delay`, widening race windows.
    pub fn with_nonce_delay(mut self, delay: Duration) -> Self {
        self.nonce_delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn signed(&self) -> Vec<UnsignedTransaction> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Sign(tx) => Some(tx),
                _ => None,
            })
            .collect()
    }

    pub fn submissions(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Submit(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn nonce(&self, address: Address) -> ChainResult<u64> {
        self.record(Call::Nonce(address));
        if self.failure == Failure::Nonce {
            return Err(ChainError::Connection("connection reset by peer".into()));
        }
        let pending = self.pending.lock().unwrap().get(&address).copied().unwrap_or(0);
        if !self.nonce_delay.is_zero() {
            tokio::time::sleep(self.nonce_delay).await;
        }
        Ok(self.start_nonce + pending)
    }

    async fn estimate_gas_price(&self) -> ChainResult<u128> {
        self.record(Call::EstimateGasPrice);
        if self.failure == Failure::GasPrice {
            return Err(ChainError::NoFeeData);
        }
        Ok(self.gas_price)
    }

    async fn sign_transaction(
        &self,
        tx: &UnsignedTransaction,
        key: &PrivateKey,
    ) -> ChainResult<SignedTransaction> {
        self.record(Call::Sign(tx.clone()));
        if self.failure == Failure::Sign {
            return Err(ChainError::Signing("Invalid private key format".into()));
        }
        // Keys that are not real secp256k1 keys sign as the zero address.
        let signer = key.address().unwrap_or_default();
        let raw = Bytes::from(format!("{}:{}:{}:{}", signer, tx.to, tx.nonce, tx.value).into_bytes());
        let hash = keccak256(&raw);
        self.signers.lock().unwrap().insert(hash, signer);
        Ok(SignedTransaction { raw, hash })
    }

    async fn submit_transaction(&self, tx: &SignedTransaction) -> ChainResult<TxHash> {
        self.record(Call::Submit(tx.hash));
        if self.failure == Failure::Submit {
            return Err(ChainError::Rpc("insufficient funds for gas * price + value (code -32000)".into()));
        }

        let source = self.signers.lock().unwrap().get(&tx.hash).copied().unwrap_or_default();
        *self.pending.lock().unwrap().entry(source).or_default() += 1;
        Ok(tx.hash)
    }
}

/// Behaviour of [`MockNode`].
#[derive(Debug, Clone)]
pub struct NodeScript {
    pub chain_id: u64,
    pub nonce: u64,
    pub base_fee: u128,
    pub tip: u128,
    pub reject_submission: Option<String>,
}

impl Default for NodeScript {
    fn default() -> Self {
        Self {
            chain_id: 31337,
            nonce: 0,
            base_fee: 20 * GWEI,
            tip: 2 * GWEI,
            reject_submission: None,
        }
    }
}

/// JSON-RPC node over WebSocket answering the calls a transfer makes.
pub struct MockNode {
    pub addr: SocketAddr,
    methods: Arc<Mutex<Vec<String>>>,
    raw_transactions: Arc<Mutex<Vec<Bytes>>>,
}

impl MockNode {
    pub async fn start(script: NodeScript) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let methods = Arc::new(Mutex::new(Vec::new()));
        let raw_transactions = Arc::new(Mutex::new(Vec::new()));

        let (m, r) = (methods.clone(), raw_transactions.clone());
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let (script, methods, raws) = (script.clone(), m.clone(), r.clone());
                tokio::spawn(async move {
                    let Ok(mut ws) = tokio_tungstenite::accept_async(stream).await else {
                        return;
                    };
                    while let Some(Ok(message)) = ws.next().await {
                        let Message::Text(text) = message else {
                            continue;
                        };
                        let Ok(request) = serde_json::from_str::<Value>(text.as_str()) else {
                            continue;
                        };
                        let response = answer(&script, &request, &methods, &raws);
                        if ws.send(Message::Text(response.to_string().into())).await.is_err() {
                            break;
                        }
                    }
                });
            }
        });

        Self {
            addr,
            methods,
            raw_transactions,
        }
    }

    pub fn url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    pub fn methods(&self) -> Vec<String> {
        self.methods.lock().unwrap().clone()
    }

    pub fn raw_transactions(&self) -> Vec<Bytes> {
        self.raw_transactions.lock().unwrap().clone()
    }
}

fn quantity(value: u128) -> Value {
    Value::String(format!("{:#x}", value))
}

fn answer(
    script: &NodeScript,
    request: &Value,
    methods: &Mutex<Vec<String>>,
    raws: &Mutex<Vec<Bytes>>,
) -> Value {
    let id = request["id"].clone();
    let method = request["method"].as_str().unwrap_or_default().to_string();
    methods.lock().unwrap().push(method.clone());

    let result = match method.as_str() {
        "eth_chainId" => quantity(script.chain_id.into()),
        "eth_getTransactionCount" => quantity(script.nonce.into()),
        "eth_feeHistory" => {
            let blocks = 4;
            json!({
                "oldestBlock": "0x64",
                "baseFeePerGas": vec![quantity(script.base_fee); blocks + 1],
                "gasUsedRatio": vec![0.5; blocks],
                "reward": vec![vec![quantity(script.tip)]; blocks],
            })
        }
        "eth_sendRawTransaction" => {
            if let Some(reason) = &script.reject_submission {
                return json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "error": { "code": -32000, "message": reason },
                });
            }
            let raw: Bytes = request["params"][0].as_str().unwrap_or_default().parse().unwrap_or_default();
            let hash = keccak256(&raw);
            raws.lock().unwrap().push(raw);
            Value::String(format!("0x{}", alloy::hex::encode(hash)))
        }
        _ => {
            return json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32601, "message": format!("method {} not found", method) },
            })
        }
    };

    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}
