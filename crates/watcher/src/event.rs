/// Emitido quando uma purga efetivamente removeu itens no backend.
/// O host deve recarregar o listing e alimentar um snapshot novo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeEvent {
    pub purged: Vec<String>,
}
