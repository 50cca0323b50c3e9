// src/services/authz.rs

// O Resolver de Autorização: o lugar ÚNICO onde se decide o que cada
// papel enxerga e pode mudar. No app original cada página refazia essas
// checagens à mão; aqui todo handler/serviço passa por estas funções.
//
// As funções de visibilidade são filtros puros e totais: nunca falham,
// nunca mutam. Usuário mal configurado (não-Superadmin sem empresa)
// recebe o conjunto vazio ("fail-closed") e o problema vai para o log.

use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::{
    auth::{Role, User},
    company::Company,
    pool::Pool,
    record::PoolRecord,
    stock::{StockItem, StockUsageRecord},
    task::Task,
};

// ---
// 1. O escopo de leitura de um usuário
// ---

enum Scope {
    // Superadmin: tudo, globalmente
    All,
    // Admin/Technician/Client: apenas a própria empresa
    Company(Uuid),
    // Configuração inválida: nada
    Nothing,
}

fn company_scope(user: &User) -> Scope {
    match (user.role, user.company_id) {
        (Role::Superadmin, _) => Scope::All,
        (_, Some(company_id)) => Scope::Company(company_id),
        (role, None) => {
            tracing::error!(
                user_id = %user.id,
                ?role,
                "Usuário sem empresa com papel que exige uma; visibilidade zerada"
            );
            Scope::Nothing
        }
    }
}

// Papéis que só enxergam piscinas da allow-list
fn uses_pool_allow_list(role: Role) -> bool {
    matches!(role, Role::Technician | Role::Client)
}

// ---
// 2. Filtros de visibilidade (leitura)
// ---

pub fn visible_companies(user: &User, all: &[Company]) -> Vec<Company> {
    match company_scope(user) {
        Scope::All => all.to_vec(),
        Scope::Company(company_id) => all
            .iter()
            .filter(|c| c.id == company_id)
            .cloned()
            .collect(),
        Scope::Nothing => Vec::new(),
    }
}

pub fn visible_users(user: &User, all: &[User]) -> Vec<User> {
    match company_scope(user) {
        Scope::All => all.to_vec(),
        Scope::Company(company_id) => all
            .iter()
            .filter(|u| u.company_id == Some(company_id))
            .cloned()
            .collect(),
        Scope::Nothing => Vec::new(),
    }
}

pub fn visible_pools(user: &User, all: &[Pool]) -> Vec<Pool> {
    match company_scope(user) {
        Scope::All => all.to_vec(),
        Scope::Company(company_id) => all
            .iter()
            .filter(|p| {
                p.company_id == company_id
                    && (!uses_pool_allow_list(user.role)
                        || user.accessible_pool_ids.contains(&p.id))
            })
            .cloned()
            .collect(),
        Scope::Nothing => Vec::new(),
    }
}

// Registros são visíveis através das piscinas visíveis.
pub fn visible_records(user: &User, pools: &[Pool], records: &[PoolRecord]) -> Vec<PoolRecord> {
    let pool_ids: Vec<Uuid> = visible_pools(user, pools).iter().map(|p| p.id).collect();
    records
        .iter()
        .filter(|r| pool_ids.contains(&r.pool_id))
        .cloned()
        .collect()
}

pub fn visible_stock_items(user: &User, all: &[StockItem]) -> Vec<StockItem> {
    match company_scope(user) {
        Scope::All => all.to_vec(),
        // Clientes não participam do estoque
        Scope::Company(_) if user.role == Role::Client => Vec::new(),
        Scope::Company(company_id) => all
            .iter()
            .filter(|i| i.company_id == company_id)
            .cloned()
            .collect(),
        Scope::Nothing => Vec::new(),
    }
}

pub fn visible_usage_records(user: &User, all: &[StockUsageRecord]) -> Vec<StockUsageRecord> {
    match company_scope(user) {
        Scope::All => all.to_vec(),
        Scope::Company(_) if user.role == Role::Client => Vec::new(),
        Scope::Company(company_id) => all
            .iter()
            .filter(|r| r.company_id == company_id)
            .cloned()
            .collect(),
        Scope::Nothing => Vec::new(),
    }
}

pub fn visible_tasks(user: &User, all: &[Task]) -> Vec<Task> {
    match company_scope(user) {
        Scope::All => all.to_vec(),
        Scope::Company(company_id) => all
            .iter()
            .filter(|t| {
                t.company_id == company_id
                    // Técnico só vê as próprias tarefas; Cliente, nenhuma
                    && match user.role {
                        Role::Technician => t.technician_id == user.id,
                        Role::Client => false,
                        _ => true,
                    }
            })
            .cloned()
            .collect(),
        Scope::Nothing => Vec::new(),
    }
}

// Uma piscina específica está ao alcance deste usuário?
pub fn can_access_pool(user: &User, pool: &Pool) -> bool {
    match company_scope(user) {
        Scope::All => true,
        Scope::Company(company_id) => {
            pool.company_id == company_id
                && (!uses_pool_allow_list(user.role)
                    || user.accessible_pool_ids.contains(&pool.id))
        }
        Scope::Nothing => false,
    }
}

// ---
// 3. Predicados de escrita (quem pode mudar o quê)
// ---

pub fn can_manage_companies(role: Role) -> bool {
    role == Role::Superadmin
}

// Criar/editar piscinas: Admin e Technician (e o operador global)
pub fn can_manage_pools(role: Role) -> bool {
    matches!(role, Role::Superadmin | Role::Admin | Role::Technician)
}

// Remover piscinas: apenas Admin (e o operador global)
pub fn can_delete_pools(role: Role) -> bool {
    matches!(role, Role::Superadmin | Role::Admin)
}

pub fn can_manage_users(role: Role) -> bool {
    matches!(role, Role::Superadmin | Role::Admin)
}

pub fn can_delete_users(role: Role) -> bool {
    matches!(role, Role::Superadmin | Role::Admin)
}

pub fn can_manage_stock(role: Role) -> bool {
    matches!(role, Role::Superadmin | Role::Admin | Role::Technician)
}

pub fn can_manage_tasks(role: Role) -> bool {
    matches!(role, Role::Superadmin | Role::Admin)
}

// ---
// 4. A Partição de Tenant (escrita)
// ---

// Garante que o recurso pertence à empresa do ator. Superadmin passa
// (operador global); qualquer outro papel só muta a própria partição.
pub fn require_same_company(
    actor: &User,
    resource_company: Uuid,
    action: &str,
) -> Result<(), AppError> {
    if actor.role == Role::Superadmin {
        return Ok(());
    }
    if actor.company_id == Some(resource_company) {
        return Ok(());
    }
    Err(AppError::permission_denied(action))
}

// Resolve a empresa em que um create vai acontecer: quem tem empresa
// escreve nela (um alvo explícito divergente é recusado); Superadmin
// precisa apontar o alvo explicitamente.
pub fn resolve_target_company(
    actor: &User,
    explicit: Option<Uuid>,
    action: &str,
) -> Result<Uuid, AppError> {
    match (actor.company_id, explicit) {
        (Some(own), None) => Ok(own),
        (Some(own), Some(target)) => {
            if own == target || actor.role == Role::Superadmin {
                Ok(target)
            } else {
                Err(AppError::permission_denied(action))
            }
        }
        (None, Some(target)) if actor.role == Role::Superadmin => Ok(target),
        (None, _) => Err(AppError::InvalidInput(
            "Informe a empresa alvo da operação.".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::test_support::{pool, user};

    #[test]
    fn superadmin_sees_all_pools() {
        let pools = vec![pool(Uuid::new_v4()), pool(Uuid::new_v4())];
        let sa = user(Role::Superadmin, None, vec![]);
        assert_eq!(visible_pools(&sa, &pools).len(), 2);
    }

    #[test]
    fn admin_sees_only_own_company() {
        let c1 = Uuid::new_v4();
        let c2 = Uuid::new_v4();
        let pools = vec![pool(c1), pool(c1), pool(c2)];
        let admin = user(Role::Admin, Some(c1), vec![]);

        let visible = visible_pools(&admin, &pools);
        assert_eq!(visible.len(), 2);
        assert!(visible.iter().all(|p| p.company_id == c1));
    }

    #[test]
    fn technician_restricted_to_allow_list() {
        let c1 = Uuid::new_v4();
        let p1 = pool(c1);
        let p2 = pool(c1);
        let tech = user(Role::Technician, Some(c1), vec![p1.id]);

        let visible = visible_pools(&tech, &[p1.clone(), p2]);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, p1.id);
    }

    #[test]
    fn technician_with_empty_allow_list_sees_nothing() {
        let c1 = Uuid::new_v4();
        let pools = vec![pool(c1), pool(c1)];
        let tech = user(Role::Technician, Some(c1), vec![]);
        assert!(visible_pools(&tech, &pools).is_empty());
    }

    #[test]
    fn allow_list_does_not_leak_other_company() {
        // Mesmo com o id na allow-list, piscina de outra empresa fica fora
        let c1 = Uuid::new_v4();
        let other = pool(Uuid::new_v4());
        let client = user(Role::Client, Some(c1), vec![other.id]);
        assert!(visible_pools(&client, &[other]).is_empty());
    }

    #[test]
    fn misconfigured_user_fails_closed() {
        let pools = vec![pool(Uuid::new_v4())];
        let broken = user(Role::Admin, None, vec![]);
        assert!(visible_pools(&broken, &pools).is_empty());
        assert!(visible_users(&broken, &[]).is_empty());
    }

    #[test]
    fn cross_company_write_is_denied() {
        let admin = user(Role::Admin, Some(Uuid::new_v4()), vec![]);
        let result = require_same_company(&admin, Uuid::new_v4(), "apagar esta piscina");
        assert!(matches!(result, Err(AppError::PermissionDenied(_))));
    }

    #[test]
    fn superadmin_passes_tenant_check() {
        let sa = user(Role::Superadmin, None, vec![]);
        assert!(require_same_company(&sa, Uuid::new_v4(), "qualquer coisa").is_ok());
    }

    #[test]
    fn create_targets_own_company_by_default() {
        let c1 = Uuid::new_v4();
        let admin = user(Role::Admin, Some(c1), vec![]);
        assert_eq!(resolve_target_company(&admin, None, "criar").unwrap(), c1);

        // Alvo explícito divergente é recusado para não-Superadmin
        let other = Uuid::new_v4();
        assert!(resolve_target_company(&admin, Some(other), "criar").is_err());
    }

    #[test]
    fn superadmin_must_name_target_company() {
        let sa = user(Role::Superadmin, None, vec![]);
        assert!(resolve_target_company(&sa, None, "criar").is_err());
        let target = Uuid::new_v4();
        assert_eq!(
            resolve_target_company(&sa, Some(target), "criar").unwrap(),
            target
        );
    }
}
