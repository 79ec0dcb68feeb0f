//! WhatsApp message text.

use crate::queue::LineupEntry;
use crate::types::Broker;

/// Signature appended when none is configured.
pub const DEFAULT_SIGNATURE: &str = "Equipe Realiza Imóveis";

/// Renders the per-broker status message.
///
/// The broker in first place is told it is their turn; everyone else gets
/// their place in line and the name of the current broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    signature: String,
}

impl MessageTemplate {
    pub fn new(signature: impl Into<String>) -> Self {
        MessageTemplate {
            signature: signature.into(),
        }
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn render(&self, entry: &LineupEntry<'_>, current: &Broker) -> String {
        if entry.is_current() {
            format!(
                "🎯 *AGORA É SUA VEZ!*\n\n\
                 Olá {name}!\n\n\
                 Você está em *1º lugar* na fila de atendimento! 📞\n\n\
                 O próximo cliente será direcionado para você.\n\n\
                 _{signature}_ 🏡",
                name = entry.broker.name,
                signature = self.signature,
            )
        } else {
            format!(
                "📋 *POSIÇÃO NA FILA ATUALIZADA*\n\n\
                 Olá {name}!\n\n\
                 Sua posição atual: *{place}º lugar*\n\n\
                 🎯 Corretor atual: {current}\n\n\
                 _{signature}_ 🏡",
                name = entry.broker.name,
                place = entry.place,
                current = current.name,
                signature = self.signature,
            )
        }
    }
}

impl Default for MessageTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_SIGNATURE)
    }
}
