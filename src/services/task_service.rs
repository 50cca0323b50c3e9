// src/services/task_service.rs

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{MemoryStore, StoreData},
    models::{
        auth::{Role, User},
        task::{CreateTaskPayload, Task, UpdateTaskPayload},
    },
    services::authz,
};

#[derive(Clone)]
pub struct TaskService {
    store: MemoryStore,
}

// O responsável por uma tarefa precisa ser um Technician da empresa alvo.
fn check_technician(
    data: &StoreData,
    company_id: Uuid,
    technician_id: Uuid,
) -> Result<String, AppError> {
    let technician = data.user(technician_id).ok_or(AppError::UserNotFound)?;
    if technician.company_id != Some(company_id) || technician.role != Role::Technician {
        return Err(AppError::InvalidInput(
            "O técnico informado não pertence à empresa.".to_string(),
        ));
    }
    Ok(technician.name.clone())
}

impl TaskService {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    pub async fn list(&self, actor: &User) -> Vec<Task> {
        let data = self.store.read().await;
        authz::visible_tasks(actor, &data.tasks)
    }

    // --- CREATE ---
    pub async fn create_task(
        &self,
        actor: &User,
        payload: CreateTaskPayload,
    ) -> Result<Task, AppError> {
        if !authz::can_manage_tasks(actor.role) {
            return Err(AppError::permission_denied("criar tarefas"));
        }

        let company_id =
            authz::resolve_target_company(actor, payload.company_id, "criar tarefas aqui")?;

        let mut data = self.store.write().await;

        if data.company(company_id).is_none() {
            return Err(AppError::not_found("Empresa"));
        }
        let technician_name = check_technician(&data, company_id, payload.technician_id)?;

        let task = Task {
            id: Uuid::new_v4(),
            company_id,
            technician_id: payload.technician_id,
            technician_name,
            description: payload.description,
            is_completed: false,
            created_at: Utc::now(),
            due_time: payload.due_time,
            has_alert: payload.has_alert,
        };

        data.tasks.push(task.clone());
        Ok(task)
    }

    // --- UPDATE ---
    pub async fn update_task(
        &self,
        actor: &User,
        task_id: Uuid,
        payload: UpdateTaskPayload,
    ) -> Result<Task, AppError> {
        if !authz::can_manage_tasks(actor.role) {
            return Err(AppError::permission_denied("editar tarefas"));
        }

        let mut data = self.store.write().await;

        let current = data
            .task(task_id)
            .ok_or_else(|| AppError::not_found("Tarefa"))?;
        authz::require_same_company(actor, current.company_id, "editar esta tarefa")?;
        let company_id = current.company_id;

        // Reatribuição também passa pela checagem de técnico
        let reassigned = match payload.technician_id {
            Some(technician_id) => Some((
                technician_id,
                check_technician(&data, company_id, technician_id)?,
            )),
            None => None,
        };

        let task = data
            .task_mut(task_id)
            .ok_or_else(|| AppError::not_found("Tarefa"))?;

        if let Some((technician_id, technician_name)) = reassigned {
            task.technician_id = technician_id;
            task.technician_name = technician_name;
        }
        if let Some(description) = payload.description {
            task.description = description;
        }
        if let Some(due_time) = payload.due_time {
            task.due_time = Some(due_time);
        }
        if let Some(has_alert) = payload.has_alert {
            task.has_alert = has_alert;
        }

        Ok(task.clone())
    }

    // --- TOGGLE (a única transição de estado: Aberta <-> Concluída) ---
    // Admin da empresa ou o próprio técnico responsável.
    pub async fn toggle_complete(&self, actor: &User, task_id: Uuid) -> Result<Task, AppError> {
        let mut data = self.store.write().await;

        let current = data
            .task(task_id)
            .ok_or_else(|| AppError::not_found("Tarefa"))?;
        authz::require_same_company(actor, current.company_id, "alterar esta tarefa")?;

        let is_assignee = current.technician_id == actor.id;
        if !authz::can_manage_tasks(actor.role) && !is_assignee {
            return Err(AppError::permission_denied("alterar esta tarefa"));
        }

        let task = data
            .task_mut(task_id)
            .ok_or_else(|| AppError::not_found("Tarefa"))?;
        task.is_completed = !task.is_completed;

        Ok(task.clone())
    }

    // --- DELETE ---
    pub async fn delete_task(&self, actor: &User, task_id: Uuid) -> Result<(), AppError> {
        if !authz::can_manage_tasks(actor.role) {
            return Err(AppError::permission_denied("remover tarefas"));
        }

        let mut data = self.store.write().await;

        let task = data
            .task(task_id)
            .ok_or_else(|| AppError::not_found("Tarefa"))?;
        authz::require_same_company(actor, task.company_id, "remover esta tarefa")?;

        data.remove_task(task_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::test_support::{company, task, user};
    use crate::db::StoreData;

    fn payload(technician_id: Uuid) -> CreateTaskPayload {
        CreateTaskPayload {
            company_id: None,
            technician_id,
            description: "Vacuum pool floor".into(),
            due_time: None,
            has_alert: false,
        }
    }

    #[tokio::test]
    async fn create_rejects_technician_from_another_company() {
        let mut data = StoreData::default();
        let c1 = company();
        let c2 = company();
        let admin = user(Role::Admin, Some(c1.id), vec![]);
        let outsider = user(Role::Technician, Some(c2.id), vec![]);
        let outsider_id = outsider.id;

        data.companies.extend([c1, c2]);
        data.users.extend([admin.clone(), outsider]);

        let store = MemoryStore::new(data);
        let service = TaskService::new(store.clone());

        let result = service.create_task(&admin, payload(outsider_id)).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        assert!(store.read().await.tasks.is_empty());
    }

    #[tokio::test]
    async fn create_rejects_non_technician_assignee() {
        let mut data = StoreData::default();
        let c = company();
        let admin = user(Role::Admin, Some(c.id), vec![]);
        let client = user(Role::Client, Some(c.id), vec![]);
        let client_id = client.id;

        data.companies.push(c);
        data.users.extend([admin.clone(), client]);

        let service = TaskService::new(MemoryStore::new(data));
        let result = service.create_task(&admin, payload(client_id)).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn toggle_flips_between_the_two_states() {
        let mut data = StoreData::default();
        let c = company();
        let tech = user(Role::Technician, Some(c.id), vec![]);
        let t = task(c.id, &tech);
        let task_id = t.id;

        data.companies.push(c);
        data.users.push(tech.clone());
        data.tasks.push(t);

        let service = TaskService::new(MemoryStore::new(data));

        // O próprio técnico responsável pode alternar
        let toggled = service.toggle_complete(&tech, task_id).await.unwrap();
        assert!(toggled.is_completed);
        let toggled = service.toggle_complete(&tech, task_id).await.unwrap();
        assert!(!toggled.is_completed);
    }

    #[tokio::test]
    async fn other_technician_cannot_toggle() {
        let mut data = StoreData::default();
        let c = company();
        let assignee = user(Role::Technician, Some(c.id), vec![]);
        let colleague = user(Role::Technician, Some(c.id), vec![]);
        let t = task(c.id, &assignee);
        let task_id = t.id;

        data.companies.push(c);
        data.users.extend([assignee, colleague.clone()]);
        data.tasks.push(t);

        let service = TaskService::new(MemoryStore::new(data));
        let result = service.toggle_complete(&colleague, task_id).await;
        assert!(matches!(result, Err(AppError::PermissionDenied(_))));
    }
}
