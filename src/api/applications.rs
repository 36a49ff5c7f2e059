use super::{json_body, ApiClient, Endpoint, Method, Subscription, Tag};
use crate::error::Result;
use crate::model::{
    application::{ApplicationEnvelope, ApplicationList, ApplicationMutation},
    ApplicationStatusUpdate, ApprovalStatus, CandidateApplication, Message, NewApplication,
};

pub static CREATE: Endpoint = Endpoint::mutation(
    "createApplication",
    Method::Post,
    "/candidate-applications",
    &[Tag::Applications],
);
pub static GET_BY_STUDENT: Endpoint = Endpoint::query(
    "getApplicationsByStudent",
    "/candidate-applications/student/:studentId",
    &[Tag::Applications],
);
pub static GET_BY_ID: Endpoint = Endpoint::query(
    "getApplicationById",
    "/candidate-applications/:id",
    &[Tag::Applications],
);
pub static GET_BY_STATUS: Endpoint = Endpoint::query(
    "getApplicationsByStatus",
    "/candidate-applications",
    &[Tag::Applications],
);
pub static UPDATE_STATUS: Endpoint = Endpoint::mutation(
    "updateApplicationStatus",
    Method::Patch,
    "/candidate-applications/:id/status",
    &[Tag::Applications, Tag::Candidates],
);
pub static WITHDRAW: Endpoint = Endpoint::mutation(
    "withdrawApplication",
    Method::Delete,
    "/candidate-applications/:id",
    &[Tag::Applications],
);

/// Candidate application routes: submission by students, review by the
/// approving offices.
pub struct ApplicationsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn applications(&self) -> ApplicationsApi<'_> {
        ApplicationsApi { client: self }
    }
}

impl ApplicationsApi<'_> {
    pub async fn create(&self, application: &NewApplication) -> Result<ApplicationMutation> {
        if application.manifesto.trim().is_empty() {
            return Err(crate::Error::InvalidRequest(
                "A manifesto is required".to_string(),
            ));
        }
        self.client
            .mutate(&CREATE, &[], json_body(application)?)
            .await
    }

    pub async fn by_student(
        &self,
        student_id: Option<&str>,
    ) -> Result<Option<Vec<CandidateApplication>>> {
        let list: Option<ApplicationList> = self
            .client
            .query_dependent(&GET_BY_STUDENT, "studentId", student_id)
            .await?;
        Ok(list.map(|l| l.applications))
    }

    pub async fn watch_by_student(&self, student_id: &str) -> Result<Subscription<ApplicationList>> {
        self.client
            .watch(&GET_BY_STUDENT, &[("studentId", student_id)], &[])
            .await
    }

    pub async fn by_id(&self, id: Option<&str>) -> Result<Option<CandidateApplication>> {
        let envelope: Option<ApplicationEnvelope> =
            self.client.query_dependent(&GET_BY_ID, "id", id).await?;
        Ok(envelope.map(|e| e.application))
    }

    /// Applications filtered by overall status, or all of them.
    pub async fn by_status(
        &self,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<CandidateApplication>> {
        let status = status.map(status_param);
        let query: Vec<(&str, &str)> = status.iter().map(|s| ("status", *s)).collect();
        let list: ApplicationList = self.client.query(&GET_BY_STATUS, &[], &query).await?;
        Ok(list.applications)
    }

    /// Record an approver's decision on one stage.
    pub async fn update_status(
        &self,
        id: &str,
        update: &ApplicationStatusUpdate,
    ) -> Result<ApplicationMutation> {
        self.client
            .mutate(&UPDATE_STATUS, &[("id", id)], json_body(update)?)
            .await
    }

    pub async fn withdraw(&self, id: &str) -> Result<Message> {
        self.client.mutate(&WITHDRAW, &[("id", id)], None).await
    }
}

fn status_param(status: ApprovalStatus) -> &'static str {
    match status {
        ApprovalStatus::Pending => "PENDING",
        ApprovalStatus::Approved => "APPROVED",
        ApprovalStatus::Rejected => "REJECTED",
    }
}
