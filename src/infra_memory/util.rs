use super::repo_tx_memory::MemoryTx;
use crate::domain_port::*;

pub(crate) fn downcast<'a, 't>(tx: &'a mut dyn StorageTx<'t>) -> &'a mut MemoryTx {
    unsafe {
        let p = tx as *mut dyn StorageTx<'t>;
        let p = p as *mut MemoryTx;
        &mut *p
    }
}
