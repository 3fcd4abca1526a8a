use std::io::{Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::constants::MAX_MESSAGE_SIZE;
use crate::error::BridgeError;

/// Read one native messaging frame: a little-endian u32 length followed by
/// that many bytes of JSON.
pub fn read_message<R: Read, T: DeserializeOwned>(reader: &mut R) -> Result<T, BridgeError> {
    let mut len_bytes = [0u8; 4];
    reader.read_exact(&mut len_bytes)?;
    let len = u32::from_le_bytes(len_bytes) as usize;

    if len > MAX_MESSAGE_SIZE {
        return Err(BridgeError::MessageTooLarge {
            size: len,
            max: MAX_MESSAGE_SIZE,
        });
    }

    let mut buffer = vec![0u8; len];
    reader.read_exact(&mut buffer)?;

    Ok(serde_json::from_slice(&buffer)?)
}

pub fn write_message<W: Write, T: Serialize>(writer: &mut W, message: &T) -> Result<(), BridgeError> {
    let json = serde_json::to_vec(message)?;
    let len = json.len() as u32;

    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(&json)?;
    writer.flush()?;

    Ok(())
}
