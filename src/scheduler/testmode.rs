use super::{PlanError, Planner};
use crate::model::Mode;
use crate::storage::Store;

/// Máquina de estados do modo de teste: Off → Active → (apply | discard) → Off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TestMode {
    #[default]
    Off,
    Active,
}

/// Liga/desliga o modo de teste.
///
/// Ligar é livre; desligar direto é recusado enquanto houver lançamento de
/// teste no escopo corrente (a única guarda da máquina).
pub(super) fn toggle<S: Store>(planner: &mut Planner<S>, on: bool) -> Result<(), PlanError> {
    if on {
        planner.test_mode = TestMode::Active;
        return Ok(());
    }

    if planner.test_mode == TestMode::Off {
        return Ok(());
    }

    let staged = planner
        .store()
        .list_entries(planner.scope(), Mode::Test)?
        .len();
    if staged > 0 {
        return Err(PlanError::TestEntriesPending(staged));
    }

    planner.test_mode = TestMode::Off;
    Ok(())
}

/// Promove todo o conjunto de teste do escopo para produção e volta a Off.
///
/// Sobrescreve contrapartes de produção com a mesma chave; por isso o
/// chamador deve confirmar em duas etapas antes de chegar aqui.
pub(super) fn apply<S: Store>(planner: &mut Planner<S>) -> Result<usize, PlanError> {
    if planner.test_mode != TestMode::Active {
        return Err(PlanError::TestModeInactive);
    }
    let scope = planner.scope();
    let count = planner.store_mut().apply_test_entries(scope)?;
    planner.test_mode = TestMode::Off;
    Ok(count)
}

/// Apaga todo o conjunto de teste do escopo e volta a Off. Irreversível.
pub(super) fn discard<S: Store>(planner: &mut Planner<S>) -> Result<usize, PlanError> {
    if planner.test_mode != TestMode::Active {
        return Err(PlanError::TestModeInactive);
    }
    let scope = planner.scope();
    let count = planner.store_mut().discard_test_entries(scope)?;
    planner.test_mode = TestMode::Off;
    Ok(count)
}
