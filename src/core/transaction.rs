// Transaction data structures and decoder

use crate::core::{ByteReader, DecodeError, Hash256, hash256};

/// Transaction input - references a previous transaction output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxInput {
    /// Txid of the transaction holding the output to spend (internal order)
    pub prev_tx_hash: Hash256,
    /// Index of the output in the previous transaction
    pub prev_index: u32,
    /// Signature script (scriptSig)
    pub script_sig: Vec<u8>,
    /// Sequence number
    pub sequence: u32,
}

impl TxInput {
    fn decode(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let prev_tx_hash = r.read_hash32()?;
        let prev_index = r.read_u32_le()?;
        let (script_len, _) = r.read_compact_size()?;
        let script_sig = r.read_bytes(script_len as usize)?.to_vec();
        let sequence = r.read_u32_le()?;

        Ok(Self {
            prev_tx_hash,
            prev_index,
            script_sig,
            sequence,
        })
    }
}

/// Transaction output - carries an amount and the conditions to spend it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutput {
    /// Amount in satoshis (1 BTC = 100,000,000 satoshis)
    pub value: u64,
    /// Public key script (scriptPubKey)
    pub script_pubkey: Vec<u8>,
}

impl TxOutput {
    fn decode(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let value = r.read_u64_le()?;
        let (script_len, _) = r.read_compact_size()?;
        let script_pubkey = r.read_bytes(script_len as usize)?.to_vec();

        Ok(Self {
            value,
            script_pubkey,
        })
    }
}

/// A fully-decoded transaction.
///
/// The txid is computed once during decoding as the double SHA256 of the raw
/// serialized bytes (pre-witness layout) and stored in internal byte order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Transaction ID (internal order)
    pub txid: Hash256,
    /// Transaction version
    pub version: u32,
    /// Transaction inputs
    pub inputs: Vec<TxInput>,
    /// Transaction outputs
    pub outputs: Vec<TxOutput>,
    /// Lock time (block height or timestamp when tx becomes valid)
    pub lock_time: u32,
}

impl Transaction {
    /// Decode one serialized transaction.
    ///
    /// The cursor span of the transaction is rehashed verbatim, so the txid
    /// matches the on-disk serialization byte for byte.
    pub fn decode(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let start = r.position();

        let version = r.read_u32_le()?;

        let (input_count, _) = r.read_compact_size()?;
        let mut inputs = Vec::with_capacity(input_count as usize);
        for _ in 0..input_count {
            inputs.push(TxInput::decode(r)?);
        }

        let (output_count, _) = r.read_compact_size()?;
        let mut outputs = Vec::with_capacity(output_count as usize);
        for _ in 0..output_count {
            outputs.push(TxOutput::decode(r)?);
        }

        let lock_time = r.read_u32_le()?;

        let txid = hash256(r.span(start, r.position()));

        Ok(Self {
            txid,
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    /// Sum of all output amounts in satoshis
    pub fn total_output_value(&self) -> u64 {
        self.outputs.iter().map(|out| out.value).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reader::write_compact_size;

    fn sample_tx_bytes() -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&1u32.to_le_bytes()); // version
        write_compact_size(&mut buf, 1); // input count
        buf.extend_from_slice(&[0u8; 32]); // prev tx hash
        buf.extend_from_slice(&0xffff_ffffu32.to_le_bytes()); // prev index
        write_compact_size(&mut buf, 3); // script length
        buf.extend_from_slice(&[0xaa, 0xbb, 0xcc]); // script sig
        buf.extend_from_slice(&0xffff_ffffu32.to_le_bytes()); // sequence
        write_compact_size(&mut buf, 2); // output count
        buf.extend_from_slice(&5_000_000_000u64.to_le_bytes()); // value
        write_compact_size(&mut buf, 1);
        buf.push(0x51); // script pubkey
        buf.extend_from_slice(&250_000_000u64.to_le_bytes()); // value
        write_compact_size(&mut buf, 0); // empty script
        buf.extend_from_slice(&0u32.to_le_bytes()); // lock time
        buf
    }

    #[test]
    fn test_decode_fields() {
        let bytes = sample_tx_bytes();
        let mut r = ByteReader::new(&bytes);
        let tx = Transaction::decode(&mut r).unwrap();

        assert_eq!(tx.version, 1);
        assert_eq!(tx.inputs.len(), 1);
        assert_eq!(tx.inputs[0].prev_tx_hash, Hash256::zero());
        assert_eq!(tx.inputs[0].prev_index, 0xffff_ffff);
        assert_eq!(tx.inputs[0].script_sig, vec![0xaa, 0xbb, 0xcc]);
        assert_eq!(tx.inputs[0].sequence, 0xffff_ffff);
        assert_eq!(tx.outputs.len(), 2);
        assert_eq!(tx.outputs[0].value, 5_000_000_000);
        assert_eq!(tx.outputs[0].script_pubkey, vec![0x51]);
        assert_eq!(tx.outputs[1].value, 250_000_000);
        assert!(tx.outputs[1].script_pubkey.is_empty());
        assert_eq!(tx.lock_time, 0);
        assert_eq!(tx.total_output_value(), 5_250_000_000);

        // Whole buffer consumed
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_txid_is_double_sha_of_raw_bytes() {
        let bytes = sample_tx_bytes();
        let mut r = ByteReader::new(&bytes);
        let tx = Transaction::decode(&mut r).unwrap();

        assert_eq!(tx.txid, hash256(&bytes));
    }

    #[test]
    fn test_txid_ignores_surrounding_bytes() {
        // The decoder must hash exactly the transaction span, not the buffer
        let bytes = sample_tx_bytes();
        let mut padded = vec![0xde, 0xad];
        padded.extend_from_slice(&bytes);

        let mut r = ByteReader::new(&padded);
        r.seek(2).unwrap();
        let tx = Transaction::decode(&mut r).unwrap();
        assert_eq!(tx.txid, hash256(&bytes));
    }

    #[test]
    fn test_decode_truncated() {
        let bytes = sample_tx_bytes();
        let cut = &bytes[..bytes.len() - 2];
        let mut r = ByteReader::new(cut);
        assert!(matches!(
            Transaction::decode(&mut r),
            Err(DecodeError::TruncatedInput { .. })
        ));
    }
}
