//! The two named email templates. Placeholders are substituted by
//! `mailer::render`; every injected value must be escaped first.

/// Welcome email sent on signup. Placeholders: `{{name}}`, `{{intro}}`.
pub const WELCOME_EMAIL_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
  <body style="margin:0;padding:0;background-color:#141414;font-family:Arial,Helvetica,sans-serif;">
    <table role="presentation" width="100%" cellpadding="0" cellspacing="0" style="background-color:#141414;padding:24px 0;">
      <tr>
        <td align="center">
          <table role="presentation" width="600" cellpadding="0" cellspacing="0" style="background-color:#1f1f1f;border-radius:8px;padding:32px;">
            <tr>
              <td style="color:#FDD458;font-size:24px;font-weight:bold;padding-bottom:16px;">
                MarketBrief
              </td>
            </tr>
            <tr>
              <td style="color:#CCDADC;font-size:18px;padding-bottom:12px;">
                Welcome aboard, {{name}}!
              </td>
            </tr>
            <tr>
              <td style="color:#CCDADC;font-size:14px;line-height:22px;padding-bottom:24px;">
                {{intro}}
              </td>
            </tr>
            <tr>
              <td style="color:#CCDADC;font-size:14px;line-height:22px;padding-bottom:24px;">
                Add the companies you care about to your watchlist and your
                personalized daily briefing will follow them from tomorrow.
              </td>
            </tr>
            <tr>
              <td style="color:#6b7280;font-size:12px;border-top:1px solid #2a2a2a;padding-top:16px;">
                You are receiving this email because you signed up for MarketBrief.
              </td>
            </tr>
          </table>
        </td>
      </tr>
    </table>
  </body>
</html>"#;

/// Daily briefing email. Placeholders: `{{date}}`, `{{newsContent}}`.
pub const NEWS_SUMMARY_EMAIL_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
  <body style="margin:0;padding:0;background-color:#141414;font-family:Arial,Helvetica,sans-serif;">
    <table role="presentation" width="100%" cellpadding="0" cellspacing="0" style="background-color:#141414;padding:24px 0;">
      <tr>
        <td align="center">
          <table role="presentation" width="600" cellpadding="0" cellspacing="0" style="background-color:#1f1f1f;border-radius:8px;padding:32px;">
            <tr>
              <td style="color:#FDD458;font-size:24px;font-weight:bold;padding-bottom:4px;">
                MarketBrief
              </td>
            </tr>
            <tr>
              <td style="color:#6b7280;font-size:13px;padding-bottom:20px;">
                Market briefing for {{date}}
              </td>
            </tr>
            <tr>
              <td style="color:#CCDADC;font-size:14px;line-height:22px;padding-bottom:24px;">
                {{newsContent}}
              </td>
            </tr>
            <tr>
              <td style="color:#6b7280;font-size:12px;border-top:1px solid #2a2a2a;padding-top:16px;">
                You are receiving this briefing because of your MarketBrief watchlist.
              </td>
            </tr>
          </table>
        </td>
      </tr>
    </table>
  </body>
</html>"#;
