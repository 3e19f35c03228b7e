// src/services/meta_service.rs
//
// CRUD de metas + cálculo de progresso. O progresso é uma função pura da meta
// e da coleção de leads, recalculada a cada snapshot; nada fica em cache.

use std::sync::Arc;

use chrono::{Months, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tokio::sync::watch;
use uuid::Uuid;

use crate::{
    common::{
        error::{validacao_simples, AppError},
        snapshots::SnapshotHub,
    },
    db::{LeadRepository, MetaRepository},
    models::{
        lead::Lead,
        meta::{Meta, MetaComProgresso, MetaPayload, MetaProgresso},
        settings::{FUNIL_CONVERSAO, STATUS_GANHO},
    },
};

#[derive(Clone)]
pub struct MetaService {
    repo: MetaRepository,
    lead_repo: LeadRepository,
    hub: Arc<SnapshotHub<Vec<Meta>>>,
}

impl MetaService {
    pub fn new(repo: MetaRepository, lead_repo: LeadRepository) -> Self {
        Self {
            repo,
            lead_repo,
            hub: Arc::new(SnapshotHub::new()),
        }
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Meta>, AppError> {
        self.repo.list_for_user(user_id).await
    }

    /// Metas do usuário com os números realizados do mês de cada uma,
    /// derivados da coleção de leads na hora da leitura. Os percentuais saem
    /// limitados a [0, 100] para exibição.
    pub async fn list_com_progresso(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<MetaComProgresso>, AppError> {
        let metas = self.repo.list_for_user(user_id).await?;
        let leads = self.lead_repo.list_for_user(user_id).await?;

        Ok(metas
            .into_iter()
            .map(|meta| {
                let progresso = progresso_da_meta(&meta, &leads).limitado();
                MetaComProgresso { meta, progresso }
            })
            .collect())
    }

    pub async fn subscribe(
        &self,
        user_id: Uuid,
    ) -> Result<watch::Receiver<Arc<Vec<Meta>>>, AppError> {
        let atual = self.repo.list_for_user(user_id).await?;
        Ok(self.hub.assinar(user_id, atual))
    }

    pub async fn create(&self, user_id: Uuid, payload: &MetaPayload) -> Result<Meta, AppError> {
        validar_payload(payload)?;
        let meta = self.repo.create(user_id, payload).await?;
        self.republicar(user_id).await;
        Ok(meta)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        payload: &MetaPayload,
    ) -> Result<Meta, AppError> {
        validar_payload(payload)?;
        let meta = self
            .repo
            .update(user_id, id, payload)
            .await?
            .ok_or(AppError::MetaNotFound)?;
        self.republicar(user_id).await;
        Ok(meta)
    }

    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(user_id, id).await? {
            return Err(AppError::MetaNotFound);
        }
        self.republicar(user_id).await;
        Ok(())
    }

    pub fn encerrar_assinatura(&self, user_id: Uuid) {
        self.hub.encerrar(user_id);
    }

    async fn republicar(&self, user_id: Uuid) {
        match self.repo.list_for_user(user_id).await {
            Ok(lista) => self.hub.publicar(user_id, lista),
            Err(e) => tracing::warn!("Falha ao republicar snapshot de metas: {}", e),
        }
    }
}

fn validar_payload(payload: &MetaPayload) -> Result<(), AppError> {
    if janela_do_mes(&payload.mes_ano).is_none() {
        return Err(validacao_simples(
            "mesAno",
            "format",
            "Informe o mês no formato YYYY-MM.",
        ));
    }
    if payload.meta_vendas.is_sign_negative() {
        return Err(validacao_simples(
            "metaVendas",
            "range",
            "A meta de vendas não pode ser negativa.",
        ));
    }
    Ok(())
}

/// Primeiro e último dia do mês "YYYY-MM" no calendário local
pub fn janela_do_mes(mes_ano: &str) -> Option<(NaiveDate, NaiveDate)> {
    let inicio = NaiveDate::parse_from_str(&format!("{mes_ano}-01"), "%Y-%m-%d").ok()?;
    let fim = inicio.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((inicio, fim))
}

/// Números realizados do mês da meta, sem clamp nos percentuais.
///
/// Eixos de data distintos, de propósito (comportamento herdado do produto):
/// leads gerados olham a data de entrada; vendas realizadas e o numerador da
/// conversão olham a data da venda, então um lead que entrou num mês anterior
/// e foi vendido dentro do mês conta na receita deste mês. O denominador da
/// conversão volta a olhar a data de entrada.
pub fn progresso_da_meta(meta: &Meta, leads: &[Lead]) -> MetaProgresso {
    let Some((inicio, fim)) = janela_do_mes(&meta.mes_ano) else {
        // Mês ilegível não derruba a leitura; a meta aparece zerada
        return MetaProgresso::zerado();
    };
    let no_mes = |d: NaiveDate| d >= inicio && d <= fim;

    let leads_gerados = leads.iter().filter(|l| no_mes(l.data_entrada)).count() as i64;

    let vendas_realizadas: Decimal = leads
        .iter()
        .filter(|l| l.status_lead == STATUS_GANHO && l.data_venda.is_some_and(no_mes))
        .filter_map(|l| l.valor_venda)
        .sum();

    let ganhos_no_mes = leads
        .iter()
        .filter(|l| l.status_lead == STATUS_GANHO && l.data_venda.is_some_and(no_mes))
        .count();
    let funil_no_mes = leads
        .iter()
        .filter(|l| no_mes(l.data_entrada) && FUNIL_CONVERSAO.contains(&l.status_lead.as_str()))
        .count();
    let conversao_real = if funil_no_mes == 0 {
        0.0
    } else {
        ganhos_no_mes as f64 / funil_no_mes as f64 * 100.0
    };

    MetaProgresso {
        leads_gerados,
        vendas_realizadas,
        conversao_real,
        progresso_leads: progresso(leads_gerados as f64, meta.meta_leads as f64),
        progresso_vendas: progresso(
            vendas_realizadas.to_f64().unwrap_or(0.0),
            meta.meta_vendas.to_f64().unwrap_or(0.0),
        ),
        progresso_conversao: progresso(conversao_real, meta.taxa_conversao_meta),
    }
}

// Meta zero rende progresso zero, nunca infinito ou NaN
fn progresso(realizado: f64, alvo: f64) -> f64 {
    if alvo <= 0.0 {
        0.0
    } else {
        realizado / alvo * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn data(ano: i32, mes: u32, dia: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(ano, mes, dia).unwrap()
    }

    fn lead(status: &str, entrada: NaiveDate) -> Lead {
        Lead {
            id: Uuid::new_v4(),
            nome: "Lead".into(),
            telefone: "".into(),
            email: "".into(),
            cidade: "".into(),
            origem_lead: "Indicação".into(),
            produto_interesse: "Produto A".into(),
            status_lead: status.into(),
            temperatura: "Quente".into(),
            responsavel: "Eu".into(),
            data_entrada: entrada,
            proximo_contato: None,
            observacoes: "".into(),
            valor_venda: None,
            data_venda: None,
            motivo_perda: None,
            created_at: Utc::now(),
        }
    }

    fn lead_ganho(valor: Decimal, entrada: NaiveDate, venda: NaiveDate) -> Lead {
        let mut l = lead(STATUS_GANHO, entrada);
        l.valor_venda = Some(valor);
        l.data_venda = Some(venda);
        l
    }

    fn meta(mes_ano: &str, meta_leads: i32, meta_vendas: Decimal, taxa: f64) -> Meta {
        Meta {
            id: Uuid::new_v4(),
            mes_ano: mes_ano.into(),
            meta_leads,
            meta_vendas,
            taxa_conversao_meta: taxa,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn janela_cobre_o_mes_inteiro() {
        let (inicio, fim) = janela_do_mes("2024-02").unwrap();
        assert_eq!(inicio, data(2024, 2, 1));
        assert_eq!(fim, data(2024, 2, 29)); // bissexto

        let (_, fim) = janela_do_mes("2024-12").unwrap();
        assert_eq!(fim, data(2024, 12, 31));
    }

    #[test]
    fn mes_ilegivel_rende_progresso_zerado() {
        assert!(janela_do_mes("2024-13").is_none());
        assert!(janela_do_mes("marco/24").is_none());

        let leads = vec![lead("Novo", data(2024, 3, 10))];
        let p = progresso_da_meta(&meta("2024-13", 10, Decimal::ZERO, 0.0), &leads);
        assert_eq!(p, MetaProgresso::zerado());
    }

    #[test]
    fn quatro_leads_de_marco_rendem_40_por_cento_da_meta_de_10() {
        let leads = vec![
            lead("Novo", data(2024, 3, 1)),
            lead("Contatado", data(2024, 3, 15)),
            lead("Novo", data(2024, 3, 31)),
            lead("Qualificado", data(2024, 3, 20)),
            lead("Novo", data(2024, 4, 1)),  // fora da janela
            lead("Novo", data(2024, 2, 29)), // fora da janela
        ];
        let p = progresso_da_meta(&meta("2024-03", 10, Decimal::ZERO, 0.0), &leads);

        assert_eq!(p.leads_gerados, 4);
        assert_eq!(p.progresso_leads, 40.0);
    }

    #[test]
    fn venda_conta_no_mes_da_venda_nao_no_da_entrada() {
        // Entrou em março, vendeu em abril: a receita é de abril
        let valor = Decimal::new(150050, 2); // 1500.50
        let leads = vec![lead_ganho(valor, data(2024, 3, 10), data(2024, 4, 2))];

        let marco = progresso_da_meta(&meta("2024-03", 0, Decimal::new(1000, 0), 0.0), &leads);
        let abril = progresso_da_meta(&meta("2024-04", 0, Decimal::new(1000, 0), 0.0), &leads);

        assert_eq!(marco.vendas_realizadas, Decimal::ZERO);
        assert_eq!(abril.vendas_realizadas, valor);
    }

    #[test]
    fn ganho_sem_valor_de_venda_nao_soma_receita() {
        let mut sem_valor = lead(STATUS_GANHO, data(2024, 3, 10));
        sem_valor.data_venda = Some(data(2024, 3, 12));

        let leads = vec![
            sem_valor,
            lead_ganho(Decimal::new(500, 0), data(2024, 3, 1), data(2024, 3, 20)),
        ];
        let p = progresso_da_meta(&meta("2024-03", 0, Decimal::ZERO, 0.0), &leads);
        assert_eq!(p.vendas_realizadas, Decimal::new(500, 0));
    }

    #[test]
    fn conversao_real_mistura_os_dois_eixos_de_data() {
        // Numerador: ganhos com venda dentro do mês. Denominador: leads que
        // ENTRARAM no mês com status de funil. Comportamento herdado.
        let leads = vec![
            lead_ganho(Decimal::ONE, data(2024, 3, 5), data(2024, 3, 20)),
            lead("Qualificado", data(2024, 3, 10)),
            lead("Negociação", data(2024, 3, 12)),
            lead("Novo", data(2024, 3, 13)),           // fora do funil
            lead("Qualificado", data(2024, 2, 1)),     // fora da janela de entrada
        ];
        let p = progresso_da_meta(&meta("2024-03", 0, Decimal::ZERO, 50.0), &leads);

        // 1 ganho ÷ 3 leads de funil entrados em março (ganho, qualificado, negociação)
        assert!((p.conversao_real - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn denominador_zero_rende_conversao_zero() {
        // Venda em março de um lead entrado em fevereiro: numerador 1,
        // denominador 0 (nenhuma entrada de funil em março) → 0, não infinito
        let leads = vec![lead_ganho(Decimal::ONE, data(2024, 2, 5), data(2024, 3, 1))];
        let p = progresso_da_meta(&meta("2024-03", 0, Decimal::ZERO, 50.0), &leads);
        assert_eq!(p.conversao_real, 0.0);

        let vazio = progresso_da_meta(&meta("2024-03", 10, Decimal::new(1000, 0), 30.0), &[]);
        assert_eq!(vazio.conversao_real, 0.0);
        assert!(vazio.progresso_leads.is_finite());
    }

    #[test]
    fn meta_zero_rende_progresso_zero_sem_nan() {
        let leads = vec![
            lead("Novo", data(2024, 3, 1)),
            lead_ganho(Decimal::new(100, 0), data(2024, 3, 2), data(2024, 3, 3)),
        ];
        let p = progresso_da_meta(&meta("2024-03", 0, Decimal::ZERO, 0.0), &leads);

        assert_eq!(p.progresso_leads, 0.0);
        assert_eq!(p.progresso_vendas, 0.0);
        assert_eq!(p.progresso_conversao, 0.0);
    }

    #[test]
    fn clamp_so_acontece_na_versao_de_exibicao() {
        let leads = vec![
            lead("Novo", data(2024, 3, 1)),
            lead("Novo", data(2024, 3, 2)),
            lead("Novo", data(2024, 3, 3)),
        ];
        let p = progresso_da_meta(&meta("2024-03", 2, Decimal::new(1000, 0), 30.0), &leads);

        // A razão crua continua disponível; só a exibição é limitada
        assert_eq!(p.progresso_leads, 150.0);
        assert_eq!(p.clone().limitado().progresso_leads, 100.0);
    }
}
