// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Native transfer transactions.
//!
//! The signing provider receives the serialized legacy message and returns
//! the signed transaction; the key never leaves the provider.

use solana_sdk::{message::Message, pubkey::Pubkey, system_instruction};

use super::types::RecentBlockhash;

/// Unsigned System Program transfer, anchored to a recent blockhash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferTransaction {
    message: Message,
}

impl TransferTransaction {
    /// Transfer from `from` to `to`, paid by `from`.
    pub fn transfer(from: &Pubkey, to: &Pubkey, lamports: u64, block: &RecentBlockhash) -> Self {
        let instruction = system_instruction::transfer(from, to, lamports);
        Self {
            message: Message::new_with_blockhash(&[instruction], Some(from), &block.blockhash),
        }
    }

    /// Transfer from an account back to itself.
    pub fn self_transfer(account: &Pubkey, lamports: u64, block: &RecentBlockhash) -> Self {
        Self::transfer(account, account, lamports, block)
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Bytes the fee payer signs.
    pub fn message_bytes(&self) -> Vec<u8> {
        self.message.serialize()
    }
}
