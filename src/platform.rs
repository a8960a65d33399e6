use embedded_hal::delay::DelayNs;

/// Execution environment of the driver.
///
/// Besides delays the driver needs a way to halt the core until an interrupt
/// arrives. On Cortex-M this is `cortex_m::asm::wfi()`, which wakes on a
/// pending interrupt even while interrupts are masked.
pub trait Platform: DelayNs {
    /// Halts until an interrupt is pending.
    ///
    /// Called with interrupts masked by a critical section. Must return as
    /// soon as an interrupt is pending, without running its handler.
    fn wait_for_interrupt(&mut self);

    /// Runs work that became ready while the core was halted.
    ///
    /// Called outside the critical section after every wake-up, which is
    /// where pending handlers get to run. The default does nothing.
    fn run_deferred_work(&mut self) {}
}
