//! Trait de contexto de execução

/// Abstração do contexto de execução corrente (processo/thread por CPU).
///
/// O núcleo de memória não conhece o scheduler; ele só precisa saber
/// *quem* está rodando (dono de sleeplocks) e como ceder a CPU enquanto
/// espera por um lock de longa duração.
pub trait ContextHal: Sync {
    /// Identidade do contexto atual. Nunca é zero.
    fn current_id(&self) -> usize;

    /// Chamado em cada iteração de espera por um sleeplock.
    fn relax(&self) {
        core::hint::spin_loop();
    }
}
