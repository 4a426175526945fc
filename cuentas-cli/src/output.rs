//! Plain-text rendering for the terminal, Colombian peso formatting.

use cuentas_finance::report::{DashboardView, SavingsSignal};

/// `1234567.8` → `$ 1.234.568` (COP has no minor units in practice).
pub fn format_cop(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("{sign}$ {grouped}")
}

pub fn format_percent(p: f64) -> String {
    format!("{p:.1}%")
}

fn signal_line(view: &DashboardView) -> String {
    let k = &view.kpis;
    match view.signal {
        SavingsSignal::Healthy => format!("Ahorraste {} este período", format_cop(k.balance)),
        SavingsSignal::BelowTarget => {
            format!("Ahorraste {}, intenta llegar al 20%", format_cop(k.balance))
        }
        SavingsSignal::Overspent => {
            format!("Gastaste {} más de lo que ingresaste", format_cop(k.balance.abs()))
        }
        SavingsSignal::Flat => "Sin ahorro en el período".to_string(),
    }
}

pub fn render_report(view: &DashboardView, table_rows: usize) -> String {
    let k = &view.kpis;
    let mut out = String::new();
    let mut line = |s: String| {
        out.push_str(&s);
        out.push('\n');
    };

    line(format!("== {} ==", view.period_label));
    if let Some(d) = view.last_data_date {
        line(format!("Datos hasta {}", d.format("%d/%m/%Y")));
    }
    line(String::new());
    line(format!("Ingresos        {:>16}  ({})", format_cop(k.income), k.income_count));
    line(format!("Gastos          {:>16}  ({})", format_cop(k.expenses), k.expense_count));
    line(format!("Balance         {:>16}", format_cop(k.balance)));
    line(format!("Tasa de ahorro  {:>16}", format_percent(k.savings_rate)));
    line(format!("Gasto diario    {:>16}", format_cop(k.daily_average)));
    if let Some(cat) = &k.dominant_category {
        line(format!("Mayor gasto     {cat} ({})", format_percent(k.dominant_percent)));
    }
    if let Some(day) = &k.max_day {
        line(format!("Día más caro    {} {}", day.date.format("%d/%m/%Y"), format_cop(day.amount)));
    }
    line(format!("Ticket promedio {:>16}", format_cop(view.average_ticket)));
    if let Some(m) = &view.top_merchant {
        line(format!("Frecuente       {} ({} visitas)", m.detail, m.visits));
    }
    line(signal_line(view));

    if !view.monthly.is_empty() {
        line(String::new());
        line("-- Mensual --".to_string());
        for p in &view.monthly {
            line(format!(
                "{}  ingresos {:>14}  gastos {:>14}  balance {:>14}",
                p.month,
                format_cop(p.income),
                format_cop(p.expenses),
                format_cop(p.balance)
            ));
        }
    }

    if !view.categories.is_empty() {
        line(String::new());
        line("-- Categorías --".to_string());
        for c in &view.categories {
            line(format!(
                "{:<18} {:>14}  {:>6}  {}",
                c.category,
                format_cop(c.amount),
                format_percent(c.percent),
                c.color
            ));
        }
    }

    if !view.members.is_empty() {
        line(String::new());
        line("-- Miembros --".to_string());
        for m in &view.members {
            let marker = if m.member.known { "" } else { " (sin registrar)" };
            line(format!("[{}] {:<16} {:>14}{marker}", m.member.initials, m.member.name, format_cop(m.amount)));
        }
    }

    if table_rows > 0 && !view.expenses.is_empty() {
        line(String::new());
        line("-- Últimos gastos --".to_string());
        for t in view.expenses.iter().take(table_rows) {
            line(format!(
                "{:>5}  {}  {:<30} {:<16} {:>14}",
                t.id.as_deref().unwrap_or("-"),
                t.date.format("%d/%m/%Y"),
                truncate(&t.detail, 30),
                t.category,
                format_cop(t.amount)
            ));
        }
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max.saturating_sub(1)).collect();
        t.push('…');
        t
    }
}
